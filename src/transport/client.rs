//! REST client with response gates and classified write calls.

use super::{ErrorClassifier, HttpRequest, HttpResponse, KintoneErrorClassifier, Method, Transport};
use crate::error::{ConnectorError, ConnectorResult};
use crate::objects::{ObjectClass, Uid};
use log::{debug, trace};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Sends requests through a [`Transport`] and interprets the responses.
///
/// Every verb first passes the response through two gates: a response the
/// classifier considers unauthenticated becomes
/// [`ConnectorError::AuthenticationFailed`], and a 5xx response becomes
/// [`ConnectorError::ServerError`]. Callers therefore only see responses
/// that passed both.
#[derive(Debug)]
pub struct RestClient<T, C = KintoneErrorClassifier> {
    instance_name: String,
    transport: T,
    classifier: C,
}

impl<T: Transport, C: ErrorClassifier> RestClient<T, C> {
    pub fn new(instance_name: impl Into<String>, transport: T, classifier: C) -> Self {
        Self {
            instance_name: instance_name.into(),
            transport,
            classifier,
        }
    }

    pub fn instance_name(&self) -> &str {
        &self.instance_name
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    async fn execute(&self, request: HttpRequest) -> ConnectorResult<HttpResponse> {
        debug!(
            "Sending {} {} to {}",
            request.method, request.url, self.instance_name
        );
        let response = self.transport.send(request).await?;
        trace!("{} responded with status {}", self.instance_name, response.status);

        if self.classifier.is_not_authenticated(&response) {
            return Err(ConnectorError::AuthenticationFailed {
                instance: self.instance_name.clone(),
                message: response.body,
            });
        }
        if self.classifier.is_server_error(&response) {
            return Err(ConnectorError::ServerError {
                instance: self.instance_name.clone(),
                status: response.status,
                body: response.body,
            });
        }
        Ok(response)
    }

    fn with_body<B: Serialize>(
        method: Method,
        url: &str,
        body: Option<&B>,
    ) -> ConnectorResult<HttpRequest> {
        let request = HttpRequest::new(method, url);
        Ok(match body {
            Some(body) => request.body(serde_json::to_value(body)?),
            None => request,
        })
    }

    pub async fn get(&self, url: &str, query: &[(&str, String)]) -> ConnectorResult<HttpResponse> {
        let request = query
            .iter()
            .fold(HttpRequest::new(Method::Get, url), |r, (k, v)| {
                r.query(*k, v.clone())
            });
        self.execute(request).await
    }

    pub async fn post<B: Serialize>(&self, url: &str, body: &B) -> ConnectorResult<HttpResponse> {
        self.execute(Self::with_body(Method::Post, url, Some(body))?)
            .await
    }

    pub async fn put<B: Serialize>(&self, url: &str, body: &B) -> ConnectorResult<HttpResponse> {
        self.execute(Self::with_body(Method::Put, url, Some(body))?)
            .await
    }

    pub async fn patch<B: Serialize>(&self, url: &str, body: &B) -> ConnectorResult<HttpResponse> {
        self.execute(Self::with_body(Method::Patch, url, Some(body))?)
            .await
    }

    pub async fn delete<B: Serialize>(
        &self,
        url: &str,
        body: Option<&B>,
    ) -> ConnectorResult<HttpResponse> {
        self.execute(Self::with_body(Method::Delete, url, body)?)
            .await
    }

    /// Decode a response body.
    pub fn decode<R: DeserializeOwned>(&self, response: &HttpResponse) -> ConnectorResult<R> {
        serde_json::from_str(&response.body).map_err(|e| {
            ConnectorError::protocol(format!(
                "Cannot parse {} REST API response: {}",
                self.instance_name, e
            ))
        })
    }

    /// GET a JSON document, failing on any non-successful status.
    pub async fn fetch<R: DeserializeOwned>(
        &self,
        object_class: ObjectClass,
        url: &str,
        query: &[(&str, String)],
        target: &str,
    ) -> ConnectorResult<R> {
        let response = self.get(url, query).await?;
        if !self.classifier.is_ok(&response) {
            return Err(self.io_error("get", object_class, target, response));
        }
        self.decode(&response)
    }

    /// POST a new record.
    pub async fn call_create<B: Serialize>(
        &self,
        object_class: ObjectClass,
        url: &str,
        body: &B,
        name: &str,
    ) -> ConnectorResult<()> {
        let response = self.post(url, body).await?;

        if self.classifier.is_already_exists(&response) {
            return Err(ConnectorError::AlreadyExists {
                object_class,
                name: name.to_string(),
            });
        }
        if self.classifier.is_invalid_request(&response) {
            return Err(ConnectorError::invalid(format!(
                "Bad request when creating {} {} '{}', response: {}",
                self.instance_name, object_class, name, response.body
            )));
        }
        if !self.classifier.is_ok(&response) {
            return Err(self.io_error("create", object_class, name, response));
        }
        Ok(())
    }

    /// PUT a change to an existing record.
    pub async fn call_update<B: Serialize>(
        &self,
        object_class: ObjectClass,
        url: &str,
        uid: &Uid,
        body: &B,
    ) -> ConnectorResult<()> {
        let response = self.put(url, body).await?;
        self.check_update("update", object_class, uid, response)
    }

    /// PATCH a change to an existing record.
    pub async fn call_patch<B: Serialize>(
        &self,
        object_class: ObjectClass,
        url: &str,
        uid: &Uid,
        body: &B,
    ) -> ConnectorResult<()> {
        let response = self.patch(url, body).await?;
        self.check_update("patch", object_class, uid, response)
    }

    /// DELETE a record.
    pub async fn call_delete<B: Serialize>(
        &self,
        object_class: ObjectClass,
        url: &str,
        uid: &Uid,
        body: Option<&B>,
    ) -> ConnectorResult<()> {
        let response = self.delete(url, body).await?;

        if self.classifier.is_not_found(&response) {
            return Err(ConnectorError::UnknownUid {
                object_class,
                uid: uid.value().to_string(),
            });
        }
        if !self.classifier.is_ok(&response) {
            return Err(self.io_error("delete", object_class, uid.value(), response));
        }
        Ok(())
    }

    fn check_update(
        &self,
        operation: &str,
        object_class: ObjectClass,
        uid: &Uid,
        response: HttpResponse,
    ) -> ConnectorResult<()> {
        if self.classifier.is_already_exists(&response) {
            return Err(ConnectorError::AlreadyExists {
                object_class,
                name: uid.name_hint().unwrap_or(uid.value()).to_string(),
            });
        }
        if self.classifier.is_invalid_request(&response) {
            return Err(ConnectorError::invalid(format!(
                "Bad request when updating {} {}: {}, response: {}",
                self.instance_name,
                object_class,
                uid.value(),
                response.body
            )));
        }
        if self.classifier.is_not_found(&response) {
            return Err(ConnectorError::UnknownUid {
                object_class,
                uid: uid.value().to_string(),
            });
        }
        if !self.classifier.is_ok(&response) {
            return Err(self.io_error(operation, object_class, uid.value(), response));
        }
        Ok(())
    }

    fn io_error(
        &self,
        operation: &str,
        object_class: ObjectClass,
        target: &str,
        response: HttpResponse,
    ) -> ConnectorError {
        ConnectorError::Io {
            operation: operation.to_string(),
            object_class,
            target: target.to_string(),
            status: response.status,
            body: response.body,
        }
    }
}

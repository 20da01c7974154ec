//! HTTP transport and response classification.
//!
//! The [`Transport`] trait is the only seam through which the connector
//! talks to the network. [`ReqwestTransport`] is the production
//! implementation; [`MockTransport`] scripts responses for tests.
//! [`RestClient`] layers the authentication and server-error gates and the
//! per-operation classification on top of any transport.

pub mod classifier;
pub mod client;
pub mod http;
pub mod mock;

pub use classifier::{ErrorClassifier, ErrorPhrases, KintoneErrorClassifier};
pub use client::RestClient;
pub use http::ReqwestTransport;
pub use mock::MockTransport;

use crate::error::ConnectorResult;
use serde_json::Value;
use std::fmt;

/// HTTP methods used by the connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A request ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A received response with its body read to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn json(status: u16, body: &Value) -> Self {
        Self::new(status, body.to_string())
    }
}

/// Sends HTTP requests.
///
/// Implementations must be shareable across concurrent operations; the
/// connector holds one transport for its whole lifetime.
pub trait Transport: Send + Sync {
    /// Send one request and read the full response.
    ///
    /// Only failures that produced no response are errors here; every HTTP
    /// status is returned as a response.
    fn send(
        &self,
        request: HttpRequest,
    ) -> impl std::future::Future<Output = ConnectorResult<HttpResponse>> + Send;
}

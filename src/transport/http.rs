//! Production transport on top of `reqwest`.

use super::{HttpRequest, HttpResponse, Method, Transport};
use crate::config::ConnectorConfig;
use crate::error::{ConnectorError, ConnectorResult};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::{debug, info};
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Client, Proxy};

/// Header carrying the password authentication credential.
pub const AUTH_HEADER: &str = "x-cybozu-authorization";

/// [`Transport`] backed by a pooled `reqwest` client.
///
/// Authentication and proxy settings are fixed at construction; the client
/// is cheap to share between concurrent operations.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    instance_name: String,
    client: Client,
}

impl ReqwestTransport {
    pub fn new(config: &ConnectorConfig) -> ConnectorResult<Self> {
        let mut builder = Client::builder()
            .connect_timeout(config.connection_timeout())
            // reqwest has no separate write timeout; bound the whole exchange.
            .timeout(config.read_timeout() + config.write_timeout())
            .default_headers(Self::default_headers(config)?);

        if let Some(host) = config.http_proxy_host.as_deref().filter(|h| !h.is_empty()) {
            let proxy_url = format!("http://{}:{}", host, config.http_proxy_port);
            let mut proxy = Proxy::all(&proxy_url).map_err(|e| {
                ConnectorError::configuration(format!("Invalid HTTP proxy '{}': {}", proxy_url, e))
            })?;
            if let (Some(user), Some(password)) =
                (config.http_proxy_user.as_deref(), &config.http_proxy_password)
            {
                proxy = password.access(|p| proxy.basic_auth(user, p));
            }
            info!("Using HTTP proxy {} for {}", proxy_url, config.instance_name);
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(|e| {
            ConnectorError::configuration(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            instance_name: config.instance_name.clone(),
            client,
        })
    }

    fn default_headers(config: &ConnectorConfig) -> ConnectorResult<HeaderMap> {
        let password = config
            .password
            .as_ref()
            .ok_or_else(|| ConnectorError::configuration("Kintone Password is required"))?;
        let credential =
            password.access(|p| STANDARD.encode(format!("{}:{}", config.login_name, p)));

        let mut auth = HeaderValue::from_str(&credential).map_err(|e| {
            ConnectorError::configuration(format!("Invalid credential header: {}", e))
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(AUTH_HEADER, auth);
        Ok(headers)
    }

    fn method(method: Method) -> reqwest::Method {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Patch => reqwest::Method::PATCH,
            Method::Delete => reqwest::Method::DELETE,
        }
    }

    fn network_error(&self, url: &str, source: reqwest::Error) -> ConnectorError {
        ConnectorError::Network {
            instance: self.instance_name.clone(),
            url: url.to_string(),
            source,
        }
    }
}

impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> ConnectorResult<HttpResponse> {
        let mut builder = self
            .client
            .request(Self::method(request.method), &request.url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder
                .header(
                    reqwest::header::CONTENT_TYPE,
                    "application/json; charset=UTF-8",
                )
                .body(body.to_string());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.network_error(&request.url, e))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| self.network_error(&request.url, e))?;

        debug!(
            "{} {} answered {} ({} bytes)",
            request.method,
            request.url,
            status,
            body.len()
        );
        Ok(HttpResponse { status, body })
    }
}

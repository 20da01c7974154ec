//! Connector configuration.
//!
//! The configuration is a flat, serde-deserializable record. Every optional
//! setting has a default so a minimal JSON document only needs the base URL
//! and the API credentials.
//!
//! # Example
//!
//! ```rust
//! use kintone_connector::config::ConnectorConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConnectorConfig::from_json_str(r#"{
//!     "baseUrl": "https://example.cybozu.com/",
//!     "loginName": "admin",
//!     "password": "secret"
//! }"#)?;
//! assert_eq!(config.base_url, "https://example.cybozu.com");
//! assert_eq!(config.default_query_page_size, 50);
//! # Ok(())
//! # }
//! ```

use crate::error::{ConnectorError, ConnectorResult};
use crate::objects::GuardedString;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::Duration;

/// Largest page the remote API will return.
pub const MAX_PAGE_SIZE: usize = 100;

/// Complete connector configuration.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectorConfig {
    /// Name used in log lines and error messages.
    pub instance_name: String,
    pub base_url: String,
    pub login_name: String,
    pub password: Option<GuardedString>,
    pub http_proxy_host: Option<String>,
    pub http_proxy_port: u16,
    pub http_proxy_user: Option<String>,
    pub http_proxy_password: Option<GuardedString>,
    pub default_query_page_size: usize,
    pub connection_timeout_in_milliseconds: u64,
    pub read_timeout_in_milliseconds: u64,
    pub write_timeout_in_milliseconds: u64,
    /// Custom item codes exposed as `customItemValues.<code>` user attributes.
    pub user_custom_item_schema: Vec<String>,
    pub ignore_organization: HashSet<String>,
    pub ignore_group: HashSet<String>,
    pub ignore_service: HashSet<String>,
    pub organization_title_delimiter: String,
    /// Extra phrases recognized in "already exists" validation messages.
    pub already_exists_phrases: Vec<String>,
    /// Extra phrases recognized in "not found" validation messages.
    pub not_found_phrases: Vec<String>,
}

impl Default for ConnectorConfig {
    fn default() -> Self {
        Self {
            instance_name: "kintone".to_string(),
            base_url: String::new(),
            login_name: String::new(),
            password: None,
            http_proxy_host: None,
            http_proxy_port: 3128,
            http_proxy_user: None,
            http_proxy_password: None,
            default_query_page_size: 50,
            connection_timeout_in_milliseconds: 10_000,
            read_timeout_in_milliseconds: 10_000,
            write_timeout_in_milliseconds: 10_000,
            user_custom_item_schema: Vec::new(),
            ignore_organization: HashSet::new(),
            ignore_group: HashSet::new(),
            ignore_service: HashSet::new(),
            organization_title_delimiter: "#".to_string(),
            already_exists_phrases: Vec::new(),
            not_found_phrases: Vec::new(),
        }
    }
}

impl std::fmt::Debug for ConnectorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectorConfig")
            .field("instance_name", &self.instance_name)
            .field("base_url", &self.base_url)
            .field("login_name", &self.login_name)
            .field("http_proxy_host", &self.http_proxy_host)
            .field("http_proxy_port", &self.http_proxy_port)
            .field("default_query_page_size", &self.default_query_page_size)
            .field("user_custom_item_schema", &self.user_custom_item_schema)
            .field(
                "organization_title_delimiter",
                &self.organization_title_delimiter,
            )
            .finish_non_exhaustive()
    }
}

impl ConnectorConfig {
    /// Create a configuration with the required settings and defaults for the rest.
    pub fn new(
        base_url: impl Into<String>,
        login_name: impl Into<String>,
        password: GuardedString,
    ) -> Self {
        let mut config = Self {
            login_name: login_name.into(),
            password: Some(password),
            ..Default::default()
        };
        config.set_base_url(base_url);
        config
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(json: &str) -> ConnectorResult<Self> {
        let mut config: Self = serde_json::from_str(json)
            .map_err(|e| ConnectorError::configuration(format!("Invalid configuration: {}", e)))?;
        let base_url = std::mem::take(&mut config.base_url);
        config.set_base_url(base_url);
        config.validate()?;
        Ok(config)
    }

    /// Set the base URL, dropping any trailing slashes.
    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
    }

    /// Check that the configuration can be used to build a connector.
    pub fn validate(&self) -> ConnectorResult<()> {
        if self.base_url.is_empty() {
            return Err(ConnectorError::configuration("Kintone Base URL is required"));
        }
        if self.login_name.is_empty() {
            return Err(ConnectorError::configuration("Kintone Login Name is required"));
        }
        if self.password.is_none() {
            return Err(ConnectorError::configuration("Kintone Password is required"));
        }
        if self.default_query_page_size == 0 || self.default_query_page_size > MAX_PAGE_SIZE {
            return Err(ConnectorError::configuration(format!(
                "Default Query Page Size must be between 1 and {}, got {}",
                MAX_PAGE_SIZE, self.default_query_page_size
            )));
        }
        if self.organization_title_delimiter.is_empty() {
            return Err(ConnectorError::configuration(
                "Organization title delimiter cannot be empty",
            ));
        }
        if self.http_proxy_user.is_some() && self.http_proxy_host.is_none() {
            return Err(ConnectorError::configuration(
                "HTTP Proxy User requires HTTP Proxy Host",
            ));
        }
        Ok(())
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_millis(self.connection_timeout_in_milliseconds)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_in_milliseconds)
    }

    pub fn write_timeout(&self) -> Duration {
        Duration::from_millis(self.write_timeout_in_milliseconds)
    }

    /// Clamp a caller-supplied page size to what the API accepts.
    pub fn effective_page_size(&self, requested: usize) -> usize {
        requested.clamp(1, MAX_PAGE_SIZE)
    }
}

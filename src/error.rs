//! Error types for connector operations.
//!
//! Every failure raised by the transport, the mapping engine or the object
//! handlers is a [`ConnectorError`]. The variants follow the semantic outcomes
//! a provisioning caller needs to tell apart: authentication problems,
//! conflicts, invalid input, vanished targets, transient infrastructure
//! failures and backend contract drift.

use crate::objects::ObjectClass;

/// Convenience alias for results produced by this crate.
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Main error type for connector operations.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    /// The remote API rejected the configured credentials.
    #[error("Cannot authenticate to the {instance} REST API: {message}")]
    AuthenticationFailed { instance: String, message: String },

    /// An object with the attempted name already exists remotely.
    #[error("{object_class} '{name}' already exists")]
    AlreadyExists {
        object_class: ObjectClass,
        name: String,
    },

    /// The request was rejected as invalid.
    #[error("Invalid attribute value: {message}")]
    InvalidAttributeValue { message: String },

    /// The addressed object no longer exists remotely.
    #[error("Unknown {object_class} uid '{uid}'")]
    UnknownUid {
        object_class: ObjectClass,
        uid: String,
    },

    /// The remote API answered with a 5xx status.
    #[error("{instance} server error (status {status}): {body}")]
    ServerError {
        instance: String,
        status: u16,
        body: String,
    },

    /// The request never produced a response.
    #[error("{instance} request to {url} failed")]
    Network {
        instance: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The response does not have the shape the backend contract promises.
    #[error("Protocol violation: {message}")]
    ProtocolViolation { message: String },

    /// Any other non-successful response.
    #[error(
        "Failed to {operation} {object_class} '{target}', statusCode: {status}, response: {body}"
    )]
    Io {
        operation: String,
        object_class: ObjectClass,
        target: String,
        status: u16,
        body: String,
    },

    /// The connection test did not succeed.
    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    /// The configuration is incomplete or out of range.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// An attribute name that the schema does not declare.
    ///
    /// This is a caller bug: names are expected to be validated against the
    /// published schema before an operation reaches the mapping engine.
    #[error("Unknown attribute '{attribute}' for {object_class}")]
    UnknownAttribute {
        object_class: ObjectClass,
        attribute: String,
    },

    /// The object class is not served by this connector.
    #[error("Unsupported object class: {0}")]
    UnsupportedObjectClass(String),

    /// A request body could not be encoded.
    #[error("JSON error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ConnectorError {
    /// Create an invalid attribute value error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidAttributeValue {
            message: message.into(),
        }
    }

    /// Create a protocol violation error.
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::ProtocolViolation {
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether retrying the same request later may succeed.
    ///
    /// This layer never retries on its own; the flag is for the caller.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::ServerError { .. } | Self::Network { .. })
    }

    /// Whether this error reports a name conflict.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    /// Whether this error reports a target that vanished remotely.
    pub fn is_unknown_uid(&self) -> bool {
        matches!(self, Self::UnknownUid { .. })
    }
}

//! Identity provisioning connector for the kintone REST API.
//!
//! Maps a generic identity model (users, organizations, groups with typed
//! attributes and add/remove deltas) onto kintone's user API.
//!
//! # Core Components
//!
//! - [`KintoneConnector`] - create, update, delete and search entry points
//! - [`SchemaDefinition`](schema::SchemaDefinition) - declarative attribute registry
//! - [`Transport`](transport::Transport) - injected HTTP seam, with
//!   [`ReqwestTransport`](transport::ReqwestTransport) and
//!   [`MockTransport`](transport::MockTransport)
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use kintone_connector::{ConnectorConfig, KintoneConnector, ObjectClass};
//! use kintone_connector::objects::{Attribute, GuardedString, NAME_NAME};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ConnectorConfig::new(
//!     "https://example.cybozu.com",
//!     "admin",
//!     GuardedString::new("secret"),
//! );
//! let connector = KintoneConnector::connect(config).await?;
//! let uid = connector
//!     .create(
//!         ObjectClass::Group,
//!         &[
//!             Attribute::single(NAME_NAME, "foo"),
//!             Attribute::single("name", "FOO"),
//!             Attribute::single("type", "static"),
//!         ],
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod applier;
pub mod config;
pub mod connector;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod kintone;
pub mod model;
pub mod objects;
pub mod pagination;
pub mod reconciler;
pub mod schema;
pub mod transport;

// Re-export commonly used types for convenience
pub use config::ConnectorConfig;
pub use connector::{KintoneConnector, Schemas, SearchResult};
pub use error::{ConnectorError, ConnectorResult};
pub use filter::{EqualsFilter, Filter};
pub use objects::{
    Attribute, AttributeDelta, AttributeValue, ConnectorObject, Name, ObjectClass,
    OperationOptions, Uid,
};

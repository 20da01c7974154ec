//! Schema-driven attribute mapping.
//!
//! A [`SchemaDefinition`] lists the attributes of one object class together
//! with the strategy that moves values between the caller's attribute model
//! and the resource model. The per-class declarations live beside the object
//! handlers; this module only provides the machinery.
//!
//! # Key Types
//!
//! - [`SchemaDefinition`] - immutable registry keyed by logical attribute name
//! - [`AttributeInfo`] - published metadata and flags of one attribute
//! - [`AttributeMapper`] / [`MultiValuedMapper`] - mapping strategies
//! - [`ReadPlan`] - which attributes of a search need a remote fetch
//!
//! # Examples
//!
//! ```rust
//! use kintone_connector::model::GroupModel;
//! use kintone_connector::schema::{AttributeInfo, AttributeType, SchemaDefinition, TextField};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let schema = SchemaDefinition::<GroupModel>::builder()
//!     .uid("groupId", AttributeType::StringCaseIgnore)
//!     .name("code", AttributeType::StringCaseIgnore, &[])
//!     .add(
//!         AttributeInfo::new("description", AttributeType::String),
//!         TextField::clearable(|m: &GroupModel| &m.description, |m| &mut m.description),
//!     )
//!     .build()?;
//! assert_eq!(schema.len(), 3);
//! # Ok(())
//! # }
//! ```

pub mod mapping;
pub mod registry;
pub mod types;


pub use mapping::{
    AssociationKind, AttributeMapper, BoolField, CodeField, DateField, DateTimeField, IdField,
    IntegerField, Mapping, MultiValuedMapper, SecretField, TextField,
};
pub use registry::{
    AttributesToGet, ReadPlan, ReadStep, SchemaBuilder, SchemaDefinition, SchemaEntry,
};
pub use types::{AttributeFlag, AttributeInfo, AttributeType};

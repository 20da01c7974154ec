//! Mapping strategies between caller values and resource model fields.
//!
//! Every declared attribute owns one strategy object. Single-valued
//! strategies implement [`AttributeMapper`] and are built from plain function
//! references to the model field they drive; association attributes use
//! [`MultiValuedMapper`], which only records membership deltas on the model
//! and leaves the remote read to the handler.

use crate::error::{ConnectorError, ConnectorResult};
use crate::model::{Field, MembershipDelta, ResourceModel};
use crate::objects::AttributeValue;
use chrono::{DateTime, NaiveDate};
use std::fmt;

/// Format of date values on the wire.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Borrow a field of the model.
pub type FieldRef<M, T> = fn(&M) -> &Field<T>;
/// Mutably borrow a field of the model.
pub type FieldMut<M, T> = fn(&mut M) -> &mut Field<T>;

/// Strategy for a single-valued attribute.
///
/// `value` is `None` when the caller supplied the attribute without a value,
/// which on update is the request to clear it. Each strategy decides how that
/// request is represented on its field.
pub trait AttributeMapper<M>: Send + Sync {
    /// Apply a value from a create request.
    fn create(&self, value: Option<&AttributeValue>, model: &mut M) -> ConnectorResult<()>;

    /// Apply a value from an update delta.
    fn delta(&self, value: Option<&AttributeValue>, model: &mut M) -> ConnectorResult<()> {
        self.create(value, model)
    }

    /// Read the caller value back from a fetched record.
    fn read(&self, model: &M) -> ConnectorResult<Option<AttributeValue>>;
}

fn expect_string(value: &AttributeValue) -> ConnectorResult<&str> {
    value
        .as_str()
        .ok_or_else(|| ConnectorError::invalid(format!("Expected a string value, got {:?}", value)))
}

fn read_only() -> ConnectorError {
    ConnectorError::invalid("Attribute is read-only")
}

/// Plain text field.
///
/// A clearable field turns a missing value into an explicit clear; a plain
/// one leaves the field out of the request instead.
pub struct TextField<M> {
    get: FieldRef<M, String>,
    get_mut: FieldMut<M, String>,
    null_clears: bool,
}

impl<M> TextField<M> {
    pub fn clearable(get: FieldRef<M, String>, get_mut: FieldMut<M, String>) -> Self {
        Self {
            get,
            get_mut,
            null_clears: true,
        }
    }

    pub fn plain(get: FieldRef<M, String>, get_mut: FieldMut<M, String>) -> Self {
        Self {
            get,
            get_mut,
            null_clears: false,
        }
    }
}

impl<M> AttributeMapper<M> for TextField<M> {
    fn create(&self, value: Option<&AttributeValue>, model: &mut M) -> ConnectorResult<()> {
        let field = (self.get_mut)(model);
        *field = match value {
            Some(value) => Field::Set(expect_string(value)?.to_string()),
            None if self.null_clears => Field::Cleared,
            None => Field::Unchanged,
        };
        Ok(())
    }

    fn read(&self, model: &M) -> ConnectorResult<Option<AttributeValue>> {
        Ok((self.get)(model)
            .as_set()
            .filter(|s| !s.is_empty())
            .map(|s| AttributeValue::String(s.clone())))
    }
}

/// Boolean field. A missing value leaves the field untouched.
pub struct BoolField<M> {
    get: FieldRef<M, bool>,
    get_mut: FieldMut<M, bool>,
}

impl<M> BoolField<M> {
    pub fn new(get: FieldRef<M, bool>, get_mut: FieldMut<M, bool>) -> Self {
        Self { get, get_mut }
    }
}

impl<M> AttributeMapper<M> for BoolField<M> {
    fn create(&self, value: Option<&AttributeValue>, model: &mut M) -> ConnectorResult<()> {
        let parsed = match value {
            Some(value) => Field::Set(value.as_bool().ok_or_else(|| {
                ConnectorError::invalid(format!("Expected a boolean value, got {:?}", value))
            })?),
            None => Field::Unchanged,
        };
        *(self.get_mut)(model) = parsed;
        Ok(())
    }

    fn read(&self, model: &M) -> ConnectorResult<Option<AttributeValue>> {
        Ok((self.get)(model).as_set().copied().map(AttributeValue::Boolean))
    }
}

/// Integer field. A missing value clears it.
pub struct IntegerField<M> {
    get: FieldRef<M, i64>,
    get_mut: FieldMut<M, i64>,
}

impl<M> IntegerField<M> {
    pub fn new(get: FieldRef<M, i64>, get_mut: FieldMut<M, i64>) -> Self {
        Self { get, get_mut }
    }
}

impl<M> AttributeMapper<M> for IntegerField<M> {
    fn create(&self, value: Option<&AttributeValue>, model: &mut M) -> ConnectorResult<()> {
        let parsed = match value {
            Some(value) => Field::Set(value.as_integer().ok_or_else(|| {
                ConnectorError::invalid(format!("Expected an integer value, got {:?}", value))
            })?),
            None => Field::Cleared,
        };
        *(self.get_mut)(model) = parsed;
        Ok(())
    }

    fn read(&self, model: &M) -> ConnectorResult<Option<AttributeValue>> {
        Ok((self.get)(model).as_set().copied().map(AttributeValue::Integer))
    }
}

/// Calendar date carried in a text field. A missing value clears it.
pub struct DateField<M> {
    get: FieldRef<M, String>,
    get_mut: FieldMut<M, String>,
}

impl<M> DateField<M> {
    pub fn new(get: FieldRef<M, String>, get_mut: FieldMut<M, String>) -> Self {
        Self { get, get_mut }
    }
}

impl<M> AttributeMapper<M> for DateField<M> {
    fn create(&self, value: Option<&AttributeValue>, model: &mut M) -> ConnectorResult<()> {
        let parsed = match value {
            Some(value) => {
                let date = value.as_date().ok_or_else(|| {
                    ConnectorError::invalid(format!("Expected a date value, got {:?}", value))
                })?;
                Field::Set(date.format(DATE_FORMAT).to_string())
            }
            None => Field::Cleared,
        };
        *(self.get_mut)(model) = parsed;
        Ok(())
    }

    fn read(&self, model: &M) -> ConnectorResult<Option<AttributeValue>> {
        match (self.get)(model).as_set().filter(|s| !s.is_empty()) {
            Some(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .map(|d| Some(AttributeValue::Date(d)))
                .map_err(|e| ConnectorError::protocol(format!("Invalid date '{}': {}", raw, e))),
            None => Ok(None),
        }
    }
}

/// Read-only timestamp maintained by the backend.
pub struct DateTimeField<M> {
    get: fn(&M) -> Option<&str>,
}

impl<M> DateTimeField<M> {
    pub fn new(get: fn(&M) -> Option<&str>) -> Self {
        Self { get }
    }
}

impl<M> AttributeMapper<M> for DateTimeField<M> {
    fn create(&self, _value: Option<&AttributeValue>, _model: &mut M) -> ConnectorResult<()> {
        Err(read_only())
    }

    fn read(&self, model: &M) -> ConnectorResult<Option<AttributeValue>> {
        match (self.get)(model).filter(|s| !s.is_empty()) {
            Some(raw) => DateTime::parse_from_rfc3339(raw)
                .map(|d| Some(AttributeValue::DateTime(d)))
                .map_err(|e| {
                    ConnectorError::protocol(format!("Invalid timestamp '{}': {}", raw, e))
                }),
            None => Ok(None),
        }
    }
}

/// Write-only secret, never read back.
pub struct SecretField<M> {
    get_mut: FieldMut<M, String>,
}

impl<M> SecretField<M> {
    pub fn new(get_mut: FieldMut<M, String>) -> Self {
        Self { get_mut }
    }
}

impl<M> AttributeMapper<M> for SecretField<M> {
    fn create(&self, value: Option<&AttributeValue>, model: &mut M) -> ConnectorResult<()> {
        let secret = value
            .ok_or_else(|| ConnectorError::invalid("A password cannot be cleared"))?
            .as_guarded()
            .ok_or_else(|| ConnectorError::invalid("Expected a guarded string value"))?;
        *(self.get_mut)(model) = Field::Set(secret.access(str::to_string));
        Ok(())
    }

    fn read(&self, _model: &M) -> ConnectorResult<Option<AttributeValue>> {
        Ok(None)
    }
}

/// The mutable code. Create sets it, an update records it as rename target.
pub struct CodeField;

impl<M: ResourceModel> AttributeMapper<M> for CodeField {
    fn create(&self, value: Option<&AttributeValue>, model: &mut M) -> ConnectorResult<()> {
        let code = value.ok_or_else(|| ConnectorError::invalid("The code is required"))?;
        model.set_code(expect_string(code)?.to_string());
        Ok(())
    }

    fn delta(&self, value: Option<&AttributeValue>, model: &mut M) -> ConnectorResult<()> {
        let code = value.ok_or_else(|| ConnectorError::invalid("The code cannot be cleared"))?;
        model.set_new_code(expect_string(code)?.to_string());
        Ok(())
    }

    fn read(&self, model: &M) -> ConnectorResult<Option<AttributeValue>> {
        Ok(model.code().map(AttributeValue::from))
    }
}

/// The system-generated identifier.
pub struct IdField;

impl<M: ResourceModel> AttributeMapper<M> for IdField {
    fn create(&self, _value: Option<&AttributeValue>, _model: &mut M) -> ConnectorResult<()> {
        Err(read_only())
    }

    fn read(&self, model: &M) -> ConnectorResult<Option<AttributeValue>> {
        Ok(model.id().map(AttributeValue::from))
    }
}

/// Relations fetched through their own endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssociationKind {
    Services,
    Organizations,
    Groups,
}

impl AssociationKind {
    /// Write order within one update.
    pub const ALL: [AssociationKind; 3] = [Self::Services, Self::Organizations, Self::Groups];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Services => "services",
            Self::Organizations => "organizations",
            Self::Groups => "groups",
        }
    }
}

impl fmt::Display for AssociationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strategy for an association attribute.
pub struct MultiValuedMapper<M> {
    kind: AssociationKind,
    membership: fn(&mut M) -> &mut MembershipDelta,
}

impl<M> MultiValuedMapper<M> {
    pub fn new(kind: AssociationKind, membership: fn(&mut M) -> &mut MembershipDelta) -> Self {
        Self { kind, membership }
    }

    pub fn kind(&self) -> AssociationKind {
        self.kind
    }

    /// Record a full membership list.
    pub fn replace(&self, values: Vec<String>, model: &mut M) {
        (self.membership)(model).replace = Some(values);
    }

    pub fn add(&self, values: Vec<String>, model: &mut M) {
        (self.membership)(model)
            .add
            .get_or_insert_with(Vec::new)
            .extend(values);
    }

    pub fn remove(&self, values: Vec<String>, model: &mut M) {
        (self.membership)(model)
            .remove
            .get_or_insert_with(Vec::new)
            .extend(values);
    }

    /// Move the recorded change out of the model.
    pub fn take(&self, model: &mut M) -> MembershipDelta {
        std::mem::take((self.membership)(model))
    }
}

/// How a declared attribute maps onto the model.
pub enum Mapping<M> {
    Single(Box<dyn AttributeMapper<M>>),
    Multi(MultiValuedMapper<M>),
}

impl<M> fmt::Debug for Mapping<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(_) => f.write_str("Single"),
            Self::Multi(mapper) => write!(f, "Multi({})", mapper.kind),
        }
    }
}

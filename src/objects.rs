//! Caller-facing object model.
//!
//! These are the types an identity-management caller hands to the connector
//! and receives back from it: object classes, identity references,
//! attributes, attribute deltas, connector objects and operation options.

use chrono::{DateTime, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the stable identifier attribute.
pub const UID_NAME: &str = "__UID__";
/// Name of the mutable name attribute.
pub const NAME_NAME: &str = "__NAME__";
/// Name of the enabled/disabled operational attribute.
pub const ENABLE_NAME: &str = "__ENABLE__";
/// Name of the password operational attribute.
pub const PASSWORD_NAME: &str = "__PASSWORD__";

/// Object types served by the connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectClass {
    User,
    Organization,
    Group,
}

impl ObjectClass {
    /// All object classes in schema order.
    pub const ALL: [ObjectClass; 3] = [Self::User, Self::Organization, Self::Group];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Organization => "organization",
            Self::Group => "group",
        }
    }

    /// Parse an object class name as used by the caller.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }
}

impl fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a remote object by its stable identifier.
///
/// The name hint carries the mutable code when the caller knows it. Name-keyed
/// operations need it, so a reference without a hint must be resolved first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Uid {
    value: String,
    name_hint: Option<String>,
}

impl Uid {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            name_hint: None,
        }
    }

    pub fn with_name(value: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            name_hint: Some(name.into()),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn name_hint(&self) -> Option<&str> {
        self.name_hint.as_deref()
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name_hint {
            Some(name) => write!(f, "{} ({})", self.value, name),
            None => f.write_str(&self.value),
        }
    }
}

/// The mutable, caller-visible name of an object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Name(String);

impl Name {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn value(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A secret string that never shows up in debug output or logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuardedString(String);

impl GuardedString {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// Expose the secret to a closure without copying it around.
    pub fn access<R>(&self, f: impl FnOnce(&str) -> R) -> R {
        f(&self.0)
    }
}

impl fmt::Debug for GuardedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GuardedString(***)")
    }
}

/// A single attribute value in the caller's model.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    String(String),
    Boolean(bool),
    Integer(i64),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
    Guarded(GuardedString),
}

impl AttributeValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_datetime(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Self::DateTime(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_guarded(&self) -> Option<&GuardedString> {
        match self {
            Self::Guarded(g) => Some(g),
            _ => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<NaiveDate> for AttributeValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl From<GuardedString> for AttributeValue {
    fn from(value: GuardedString) -> Self {
        Self::Guarded(value)
    }
}

/// A named attribute with zero or more values.
///
/// `complete` is false when the values were intentionally not fetched
/// because the caller allowed partial attribute values.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: String,
    pub values: Vec<AttributeValue>,
    pub complete: bool,
}

impl Attribute {
    pub fn new(name: impl Into<String>, values: Vec<AttributeValue>) -> Self {
        Self {
            name: name.into(),
            values,
            complete: true,
        }
    }

    pub fn single(name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self::new(name, vec![value.into()])
    }

    /// An attribute present in the request but carrying no value.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, Vec::new())
    }

    pub fn strings<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            name,
            values
                .into_iter()
                .map(|v| AttributeValue::String(v.into()))
                .collect(),
        )
    }

    /// An attribute whose values were skipped and must be fetched separately.
    pub fn incomplete(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: Vec::new(),
            complete: false,
        }
    }

    pub fn first_value(&self) -> Option<&AttributeValue> {
        self.values.first()
    }
}

/// A change request against one attribute.
///
/// Single-valued attributes use `values_to_replace`; an empty replacement list
/// asks for the value to be cleared. Multi-valued attributes may carry any
/// combination of the three lists.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeDelta {
    pub name: String,
    pub values_to_replace: Option<Vec<AttributeValue>>,
    pub values_to_add: Option<Vec<AttributeValue>>,
    pub values_to_remove: Option<Vec<AttributeValue>>,
}

impl AttributeDelta {
    pub fn replace(name: impl Into<String>, values: Vec<AttributeValue>) -> Self {
        Self {
            name: name.into(),
            values_to_replace: Some(values),
            ..Default::default()
        }
    }

    pub fn replace_single(name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self::replace(name, vec![value.into()])
    }

    /// A delta that clears a single-valued attribute.
    pub fn clear(name: impl Into<String>) -> Self {
        Self::replace(name, Vec::new())
    }

    pub fn add_remove<A, R, S>(name: impl Into<String>, add: A, remove: R) -> Self
    where
        A: IntoIterator<Item = S>,
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let to_values = |values: Vec<AttributeValue>| (!values.is_empty()).then_some(values);
        Self {
            name: name.into(),
            values_to_replace: None,
            values_to_add: to_values(
                add.into_iter()
                    .map(|v| AttributeValue::String(v.into()))
                    .collect(),
            ),
            values_to_remove: to_values(
                remove
                    .into_iter()
                    .map(|v| AttributeValue::String(v.into()))
                    .collect(),
            ),
        }
    }
}

/// An object returned from a search.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectorObject {
    pub object_class: ObjectClass,
    pub uid: Uid,
    pub name: Name,
    pub attributes: Vec<Attribute>,
}

impl ConnectorObject {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }
}

/// Options recognized by create, update and search operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationOptions {
    pub page_size: Option<usize>,
    /// 1-based offset of the first result; `None` or 0 requests all data.
    pub paged_results_offset: Option<usize>,
    pub return_default_attributes: Option<bool>,
    pub attributes_to_get: Option<Vec<String>>,
    pub allow_partial_attribute_values: Option<bool>,
}

impl OperationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn with_paged_results_offset(mut self, offset: usize) -> Self {
        self.paged_results_offset = Some(offset);
        self
    }

    pub fn with_return_default_attributes(mut self, value: bool) -> Self {
        self.return_default_attributes = Some(value);
        self
    }

    pub fn with_attributes_to_get<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes_to_get = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_allow_partial_attribute_values(mut self, value: bool) -> Self {
        self.allow_partial_attribute_values = Some(value);
        self
    }

    /// Page size requested by the caller, or the configured default.
    pub fn resolve_page_size(&self, default_page_size: usize) -> usize {
        match self.page_size {
            Some(size) if size > 0 => size,
            _ => default_page_size,
        }
    }

    /// Page offset requested by the caller; 0 means all data.
    pub fn resolve_page_offset(&self) -> usize {
        self.paged_results_offset.unwrap_or(0)
    }

    pub fn should_allow_partial_attribute_values(&self) -> bool {
        self.allow_partial_attribute_values.unwrap_or(false)
    }
}

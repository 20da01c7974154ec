//! Attribute metadata published by a schema.

use crate::objects::AttributeValue;

/// Value type of a declared attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    String,
    /// A string compared without regard to case by the caller.
    StringCaseIgnore,
    Boolean,
    Integer,
    /// Calendar date, stored remotely as `YYYY-MM-DD`.
    Date,
    /// Timestamp, stored remotely in RFC 3339 form.
    DateTime,
    GuardedString,
}

impl AttributeType {
    /// Whether a caller-supplied value has the right shape for this type.
    pub fn accepts(&self, value: &AttributeValue) -> bool {
        matches!(
            (self, value),
            (Self::String | Self::StringCaseIgnore, AttributeValue::String(_))
                | (Self::Boolean, AttributeValue::Boolean(_))
                | (Self::Integer, AttributeValue::Integer(_))
                | (Self::Date, AttributeValue::Date(_))
                | (Self::DateTime, AttributeValue::DateTime(_))
                | (Self::GuardedString, AttributeValue::Guarded(_))
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::StringCaseIgnore => "stringCaseIgnore",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Date => "date",
            Self::DateTime => "dateTime",
            Self::GuardedString => "guardedString",
        }
    }
}

/// Flags restricting how an attribute takes part in operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeFlag {
    Required,
    NotCreatable,
    NotUpdatable,
    NotReadable,
    NotReturnedByDefault,
}

/// Description of one declared attribute.
///
/// `name` is the logical name the caller uses, `native_name` the name of the
/// backing resource field, and `fetch_field` the remote field that has to be
/// fetched to read the attribute. The last two differ only for the
/// identifier attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeInfo {
    pub name: String,
    pub native_name: String,
    fetch_field: Option<String>,
    pub attribute_type: AttributeType,
    pub multi_valued: bool,
    pub required: bool,
    pub creatable: bool,
    pub updatable: bool,
    pub readable: bool,
    pub returned_by_default: bool,
}

impl AttributeInfo {
    pub fn new(name: impl Into<String>, attribute_type: AttributeType) -> Self {
        let name = name.into();
        Self {
            native_name: name.clone(),
            name,
            fetch_field: None,
            attribute_type,
            multi_valued: false,
            required: false,
            creatable: true,
            updatable: true,
            readable: true,
            returned_by_default: true,
        }
    }

    pub fn native_name(mut self, native_name: impl Into<String>) -> Self {
        self.native_name = native_name.into();
        self
    }

    /// Read the attribute from a remote field other than its native name.
    pub fn fetch_from(mut self, field: impl Into<String>) -> Self {
        self.fetch_field = Some(field.into());
        self
    }

    pub fn multi_valued(mut self) -> Self {
        self.multi_valued = true;
        self
    }

    pub fn flags(mut self, flags: &[AttributeFlag]) -> Self {
        for flag in flags {
            match flag {
                AttributeFlag::Required => self.required = true,
                AttributeFlag::NotCreatable => self.creatable = false,
                AttributeFlag::NotUpdatable => self.updatable = false,
                AttributeFlag::NotReadable => self.readable = false,
                AttributeFlag::NotReturnedByDefault => self.returned_by_default = false,
            }
        }
        self
    }

    /// Remote field fetched to read this attribute.
    pub fn fetch_field(&self) -> &str {
        self.fetch_field.as_deref().unwrap_or(&self.native_name)
    }
}

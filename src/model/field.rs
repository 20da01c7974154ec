//! Three-state field values for partial updates.
//!
//! A resource model doubles as an update payload, so every regular field has
//! to say whether it takes part in the request at all. `Field` makes that
//! explicit instead of overloading `null` and `""`.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A resource field that may be untouched, cleared or set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Field<T> {
    /// Not involved in this operation.
    #[default]
    Unchanged,
    /// Explicitly cleared by the caller.
    Cleared,
    /// Set to a value.
    Set(T),
}

impl<T> Field<T> {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }

    pub fn is_changed(&self) -> bool {
        !self.is_unchanged()
    }

    pub fn as_set(&self) -> Option<&T> {
        match self {
            Self::Set(value) => Some(value),
            _ => None,
        }
    }

    /// `None` means the caller did not touch the value.
    pub fn keeping(value: Option<T>) -> Self {
        value.map_or(Self::Unchanged, Self::Set)
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Unchanged => serializer.serialize_none(),
            // The API removes a value when it receives an empty string,
            // whatever the declared type of the field.
            Self::Cleared => serializer.serialize_str(""),
            Self::Set(value) => value.serialize(serializer),
        }
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::keeping)
    }
}

/// Deserialize an integer field that the API may send as a number or a string.
pub fn lenient_integer<'de, D>(deserializer: D) -> Result<Field<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(Field::Unchanged),
        Value::Number(n) => n
            .as_i64()
            .map(Field::Set)
            .ok_or_else(|| de::Error::custom(format!("integer out of range: {}", n))),
        Value::String(s) if s.is_empty() => Ok(Field::Cleared),
        Value::String(s) => s
            .parse::<i64>()
            .map(Field::Set)
            .map_err(|_| de::Error::custom(format!("invalid integer: {}", s))),
        other => Err(de::Error::custom(format!("invalid integer: {}", other))),
    }
}

//! Search filter translation.
//!
//! The backend can only look records up by identifier or by code, so the
//! only filters a search accepts are equality on `__UID__` or `__NAME__`.

use crate::objects::{AttributeValue, NAME_NAME, Name, UID_NAME, Uid};

/// A search restricted to one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    ByUid(Uid),
    ByName(Name),
}

/// An equality filter as handed over by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct EqualsFilter {
    pub attribute: String,
    pub value: AttributeValue,
    pub negated: bool,
}

impl EqualsFilter {
    pub fn new(attribute: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self {
            attribute: attribute.into(),
            value: value.into(),
            negated: false,
        }
    }

    pub fn not(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    /// Translate into a backend lookup.
    ///
    /// `None` means the backend cannot serve the filter as a lookup; the
    /// caller then falls back to a full scan and filters on its side.
    pub fn translate(&self) -> Option<Filter> {
        if self.negated {
            return None;
        }
        let value = self.value.as_str()?;
        match self.attribute.as_str() {
            UID_NAME => Some(Filter::ByUid(Uid::new(value))),
            NAME_NAME => Some(Filter::ByName(Name::new(value))),
            _ => None,
        }
    }
}

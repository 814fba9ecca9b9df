//! Identifier types that accept either JSON strings or numbers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An identifier the backend may encode as a JSON string or integer.
///
/// The incoming representation is preserved so the value can be echoed
/// back to the backend exactly as it was received.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlexibleId {
    /// Integer form, e.g. `12345`.
    Number(i64),
    /// String form, e.g. `"12345"`.
    Text(String),
}

impl FlexibleId {
    /// Interprets the identifier as an integer, if possible.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FlexibleId::Number(n) => Some(*n),
            FlexibleId::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for FlexibleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlexibleId::Number(n) => write!(f, "{}", n),
            FlexibleId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Backend identifier of a tracked section.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(FlexibleId);

impl SectionId {
    /// Creates a section ID from its string form.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(FlexibleId::Text(s.into()))
    }
}

impl From<i64> for SectionId {
    fn from(n: i64) -> Self {
        Self(FlexibleId::Number(n))
    }
}

impl From<&str> for SectionId {
    fn from(s: &str) -> Self {
        Self::from_string(s)
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

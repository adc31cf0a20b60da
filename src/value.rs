//! Loosely typed field values
//!
//! Sitemap fields can be fed from several kinds of sources: XML text,
//! filesystem timestamps, literal option values and user callbacks. Each of
//! them produces a [`FieldValue`], which the [`Entry`](crate::Entry) setters
//! validate and convert.

use crate::date::format_w3c;
use chrono::{DateTime, Utc};

/// A value offered to one of the entry setters
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    /// No value; setters treat it as "leave unchanged"
    #[default]
    Absent,
    /// Boolean flag
    Bool(bool),
    /// Number (epoch milliseconds for dates)
    Number(f64),
    /// Text (W3C datetime for dates, decimal for priorities)
    Text(String),
    /// Timestamp
    Date(DateTime<Utc>),
}

impl FieldValue {
    /// Whether the value counts as "not provided"
    ///
    /// Mirrors the usual loose truthiness rules: absent values, `false`,
    /// zero, NaN and empty text are all falsy.
    pub fn is_falsy(&self) -> bool {
        match self {
            FieldValue::Absent => true,
            FieldValue::Bool(b) => !b,
            FieldValue::Number(n) => *n == 0.0 || n.is_nan(),
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::Date(_) => false,
        }
    }

    /// Short name of the variant, used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Absent => "absent",
            FieldValue::Bool(_) => "boolean",
            FieldValue::Number(_) => "number",
            FieldValue::Text(_) => "text",
            FieldValue::Date(_) => "date",
        }
    }

    /// Render the value as free text, `None` when absent
    pub fn into_text(self) -> Option<String> {
        match self {
            FieldValue::Absent => None,
            FieldValue::Bool(b) => Some(b.to_string()),
            FieldValue::Number(n) => Some(n.to_string()),
            FieldValue::Text(s) => Some(s),
            FieldValue::Date(dt) => Some(format_w3c(&dt)),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Number(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Number(value as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(value: DateTime<Utc>) -> Self {
        FieldValue::Date(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Absent, Into::into)
    }
}

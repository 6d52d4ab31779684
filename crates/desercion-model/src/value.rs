#![deny(unsafe_code)]

use std::fmt;

use desercion_common::{coerce_stratum, format_numeric, parse_f64};

/// A single cell of an attrition record.
///
/// Sources are loosely typed: the same field may hold integers in one table
/// and text (including sentinels such as `"SIN INFORMACION"`) in another, so
/// every consumer pattern-matches on the variant instead of assuming a shape.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Missing,
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_missing(&self) -> bool {
        match self {
            Self::Missing => true,
            Self::Float(v) => !v.is_finite(),
            Self::Text(_) | Self::Integer(_) => false,
        }
    }

    /// Grouping key used for domains, filters and frequency counts.
    ///
    /// Numbers render without trailing zeros so `Integer(3)` and `Float(3.0)`
    /// share the key `"3"`. Missing cells have no key.
    pub fn key(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Integer(v) => Some(v.to_string()),
            Self::Float(v) if v.is_finite() => Some(format_numeric(*v)),
            Self::Float(_) | Self::Missing => None,
        }
    }

    /// Numeric coercion; text is parsed, failures yield `None`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(v) => Some(*v as f64),
            Self::Float(v) => Some(*v).filter(|v| v.is_finite()),
            Self::Text(s) => parse_f64(s),
            Self::Missing => None,
        }
    }

    /// Stratum coercion with `int(float(value))` semantics.
    pub fn as_stratum(&self) -> Option<i64> {
        match self {
            Self::Integer(v) => Some(*v),
            Self::Float(v) if v.is_finite() => Some(v.trunc() as i64),
            Self::Text(s) => coerce_stratum(s),
            Self::Float(_) | Self::Missing => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.key() {
            Some(key) => f.write_str(&key),
            None => f.write_str(""),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

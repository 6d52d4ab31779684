//! Filter selections and option domains.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Token used by the UI for the "no filter" sentinel.
pub const ALL_TOKEN: &str = "all";

/// One filter choice: the "all" sentinel or a concrete domain value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterValue {
    All,
    Value(String),
}

impl FilterValue {
    /// Parse a raw UI token; `"all"` (any case) or a blank string means no filter.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(ALL_TOKEN) {
            Self::All
        } else {
            Self::Value(trimmed.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::All => ALL_TOKEN,
            Self::Value(value) => value,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entry of a filter dropdown.
///
/// `label` is for display and may be truncated; `value` is always the
/// untruncated original.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    pub label: String,
    pub value: FilterValue,
}

impl FilterOption {
    pub fn all(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: FilterValue::All,
        }
    }

    pub fn value(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: FilterValue::Value(value.into()),
        }
    }
}

/// Named filter selections, applied left to right as a conjunction.
///
/// Setting a field twice replaces the earlier choice in place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    entries: Vec<(String, FilterValue)>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, field: impl Into<String>, value: FilterValue) -> Self {
        self.set(field, value);
        self
    }

    /// Shorthand for selecting one concrete value.
    #[must_use]
    pub fn with_value(self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(field, FilterValue::Value(value.into()))
    }

    pub fn set(&mut self, field: impl Into<String>, value: FilterValue) {
        let field = field.into();
        match self.entries.iter_mut().find(|(name, _)| *name == field) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((field, value)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&FilterValue> {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, value)| value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// True when no entry narrows the table.
    pub fn is_all(&self) -> bool {
        self.entries.iter().all(|(_, value)| value.is_all())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Fixed age ranges offered by the age filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeBucket {
    From16To20,
    From21To25,
    From26To30,
    From31,
}

impl AgeBucket {
    pub const ALL: [AgeBucket; 4] = [
        AgeBucket::From16To20,
        AgeBucket::From21To25,
        AgeBucket::From26To30,
        AgeBucket::From31,
    ];

    /// Filter value token, e.g. `"16-20"`.
    pub fn token(self) -> &'static str {
        match self {
            Self::From16To20 => "16-20",
            Self::From21To25 => "21-25",
            Self::From26To30 => "26-30",
            Self::From31 => "31+",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::From16To20 => "16-20 años",
            Self::From21To25 => "21-25 años",
            Self::From26To30 => "26-30 años",
            Self::From31 => "31+ años",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|bucket| bucket.token() == token.trim())
    }

    /// Inclusive bounds; `31+` is open-ended.
    pub fn contains(self, age: f64) -> bool {
        match self {
            Self::From16To20 => (16.0..=20.0).contains(&age),
            Self::From21To25 => (21.0..=25.0).contains(&age),
            Self::From26To30 => (26.0..=30.0).contains(&age),
            Self::From31 => age >= 31.0,
        }
    }
}

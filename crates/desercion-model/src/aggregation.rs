//! Aggregation requests and their tabular results.
//!
//! Results are derived fresh for every request. Each kind reports its entry
//! count through [`AggregationResult::len`]; an empty subview or an absent
//! field always produces a result with zero entries.

use serde::{Deserialize, Serialize};

/// Default number of entries kept by top-K frequency requests.
pub const DEFAULT_TOP_K: usize = 10;

/// Default number of equal-width bins for histograms.
pub const DEFAULT_HISTOGRAM_BINS: usize = 30;

/// Ordering of frequency entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyOrder {
    /// Descending count; ties keep first-encountered order.
    #[default]
    CountDescending,
    /// Ascending key, numerically when both keys are numbers.
    KeyAscending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencySpec {
    pub field: String,
    pub top_k: Option<usize>,
    pub order: FrequencyOrder,
    /// Display labels longer than this are truncated with an ellipsis.
    pub label_width: Option<usize>,
}

impl FrequencySpec {
    /// Every distinct value, most frequent first.
    pub fn all(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            top_k: None,
            order: FrequencyOrder::CountDescending,
            label_width: None,
        }
    }

    /// The [`DEFAULT_TOP_K`] most frequent values.
    pub fn top(field: impl Into<String>) -> Self {
        Self::all(field).with_top_k(DEFAULT_TOP_K)
    }

    /// Every distinct value in ascending key order (time series).
    pub fn by_key(field: impl Into<String>) -> Self {
        Self {
            order: FrequencyOrder::KeyAscending,
            ..Self::all(field)
        }
    }

    #[must_use]
    pub fn with_top_k(mut self, k: usize) -> Self {
        self.top_k = Some(k);
        self
    }

    #[must_use]
    pub fn with_label_width(mut self, width: usize) -> Self {
        self.label_width = Some(width);
        self
    }
}

/// What to compute over a subview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AggregationSpec {
    Frequency(FrequencySpec),
    /// Counts per coerced stratum, ascending; non-numeric strata excluded.
    StratumDistribution,
    CrossTab {
        rows: String,
        columns: String,
        /// Keep only the K most frequent row keys.
        top_rows: Option<usize>,
    },
    NumericSummary {
        field: String,
    },
    GroupedSummary {
        group: String,
        value: String,
    },
    Histogram {
        field: String,
        bins: usize,
    },
    Completeness,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    /// Original value, usable for joins and filters.
    pub key: String,
    /// Display label, possibly truncated.
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyTable {
    pub field: String,
    pub entries: Vec<FrequencyEntry>,
}

impl FrequencyTable {
    pub fn empty(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            entries: Vec::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|entry| entry.count).sum()
    }
}

/// Co-occurrence counts; `cells[r][c]` pairs `row_keys[r]` with `column_keys[c]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossTab {
    pub row_field: String,
    pub column_field: String,
    pub row_keys: Vec<String>,
    pub column_keys: Vec<String>,
    pub cells: Vec<Vec<usize>>,
}

impl CrossTab {
    pub fn empty(row_field: impl Into<String>, column_field: impl Into<String>) -> Self {
        Self {
            row_field: row_field.into(),
            column_field: column_field.into(),
            row_keys: Vec::new(),
            column_keys: Vec::new(),
            cells: Vec::new(),
        }
    }

    pub fn get(&self, row_key: &str, column_key: &str) -> usize {
        let row = self.row_keys.iter().position(|key| key == row_key);
        let column = self.column_keys.iter().position(|key| key == column_key);
        match (row, column) {
            (Some(r), Some(c)) => self.cells[r][c],
            _ => 0,
        }
    }
}

/// Descriptive statistics over the coercible values of one field.
///
/// `std` is the sample standard deviation (n - 1 denominator) and is `None`
/// for fewer than two values. Quartiles use linear interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    pub std: Option<f64>,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub key: String,
    pub summary: NumericSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldCompleteness {
    pub field: String,
    pub non_missing: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletenessReport {
    pub total_rows: usize,
    pub fields: Vec<FieldCompleteness>,
    /// Mean of the per-field percentages; `None` when nothing was measured.
    pub average_percent: Option<f64>,
}

impl CompletenessReport {
    pub fn empty() -> Self {
        Self {
            total_rows: 0,
            fields: Vec::new(),
            average_percent: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AggregationResult {
    Frequency(FrequencyTable),
    CrossTab(CrossTab),
    NumericSummary {
        field: String,
        summary: Option<NumericSummary>,
    },
    GroupedSummary {
        group: String,
        value: String,
        groups: Vec<GroupSummary>,
    },
    Histogram {
        field: String,
        bins: Vec<HistogramBin>,
    },
    Completeness(CompletenessReport),
}

impl AggregationResult {
    /// Number of entries (rows of the result table).
    pub fn len(&self) -> usize {
        match self {
            Self::Frequency(table) => table.entries.len(),
            Self::CrossTab(table) => table.row_keys.len(),
            Self::NumericSummary { summary, .. } => usize::from(summary.is_some()),
            Self::GroupedSummary { groups, .. } => groups.len(),
            Self::Histogram { bins, .. } => bins.len(),
            Self::Completeness(report) => report.fields.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Headline figures for the overview cards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub total_records: usize,
    pub mean_age: Option<f64>,
    pub dominant_gender: Option<String>,
    /// Most frequent faculty, label truncated for display.
    pub critical_faculty: Option<String>,
}

//! Data model for the attrition analytics engine.
//!
//! - **value / table**: loosely typed records, immutable sources, the combined
//!   working table and borrowed subviews
//! - **filter**: filter selections, option domains and age buckets
//! - **aggregation**: aggregation requests and tabular results
//! - **risk**: the synthetic risk profile and its assessment

pub mod aggregation;
pub mod error;
pub mod fields;
pub mod filter;
pub mod ids;
pub mod risk;
pub mod table;
pub mod value;

pub use aggregation::{
    AggregationResult, AggregationSpec, CompletenessReport, CrossTab, DEFAULT_HISTOGRAM_BINS,
    DEFAULT_TOP_K, FieldCompleteness, FrequencyEntry, FrequencyOrder, FrequencySpec,
    FrequencyTable, GroupSummary, HistogramBin, KpiSummary, NumericSummary,
};
pub use error::{ModelError, Result};
pub use filter::{ALL_TOKEN, AgeBucket, FilterOption, FilterSelection, FilterValue};
pub use ids::{FieldName, SourceName};
pub use risk::{
    Genero, Jornada, Modalidad, Recommendation, RiskAssessment, RiskFactor, RiskFactorKind,
    RiskProfile, RiskTier,
};
pub use table::{Record, RecordSource, SubView, WorkingTable};
pub use value::FieldValue;

//! Shared utilities for the attrition analytics crates.
//!
//! This crate provides the coercion rules every stage relies on: Polars
//! `AnyValue` conversion, lenient numeric parsing that never raises, and the
//! display-only label truncation used by filter options and top-K tables.

pub mod text;
pub mod values;

// Re-export commonly used functions at crate root for convenience
pub use text::{ELLIPSIS, truncate_label};
pub use values::{
    any_to_i64, any_to_string, coerce_stratum, format_numeric, parse_f64, parse_i64,
};

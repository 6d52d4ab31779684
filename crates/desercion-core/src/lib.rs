//! Attrition analytics engine.
//!
//! Data flows leaf-first through pure stages:
//!
//! - **combiner**: union of selected sources, tagged with `dataset_origen`
//! - **filter**: option domains and filtered subviews
//! - **aggregate** / **stats**: counts, cross-tabs and descriptive statistics
//! - **kpi**: overview figures
//! - **risk**: the fixed-weight dropout risk heuristic
//! - **engine**: facade holding the injected catalog or the no-data state
//!
//! No stage keeps state between calls.

pub mod aggregate;
pub mod combiner;
pub mod engine;
pub mod error;
pub mod filter;
pub mod kpi;
pub mod risk;
pub mod stats;

pub use aggregate::aggregate;
pub use combiner::combine;
pub use engine::{Engine, SelectionInfo, SourceInfo};
pub use error::{EngineError, Result};
pub use filter::{ALL_LABEL, apply, apply_to_view, domain_for, domain_with_width};
pub use kpi::kpis;
pub use risk::{assess, score, tier_for};

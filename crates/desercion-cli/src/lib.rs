//! CLI library components for the attrition dashboard.

pub mod logging;
pub mod render;
pub mod selection;

//! Engine facade over an injected source catalog.

use std::path::Path;

use serde::Serialize;
use tracing::{error, info};

use desercion_ingest::{DisplayConfig, EngineConfig, SourceCatalog};
use desercion_model::{
    AggregationResult, AggregationSpec, FilterOption, FilterSelection, KpiSummary, RiskAssessment,
    RiskProfile, RiskTier, SubView, WorkingTable,
};

use crate::error::{EngineError, Result};
use crate::{aggregate, combiner, filter, kpi, risk};

/// One selectable source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceInfo {
    pub name: String,
    pub label: String,
    pub rows: usize,
}

/// Labels and combined size of a dataset selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionInfo {
    /// Source labels in canonical order.
    pub labels: Vec<String>,
    pub total_rows: usize,
}

#[derive(Debug, Clone)]
enum EngineState {
    Ready(SourceCatalog),
    NoData { reason: String },
}

/// Entry point for every interaction.
///
/// Holds the immutable catalog (or the no-data state) and the display
/// limits; each call recomputes from its inputs.
#[derive(Debug, Clone)]
pub struct Engine {
    state: EngineState,
    display: DisplayConfig,
}

impl Engine {
    /// Build an engine over a loaded catalog. An empty catalog puts the
    /// engine in its no-data state.
    pub fn new(catalog: SourceCatalog, display: DisplayConfig) -> Self {
        let state = if catalog.is_empty() {
            EngineState::NoData {
                reason: "no record source could be loaded".to_string(),
            }
        } else {
            EngineState::Ready(catalog)
        };
        Self { state, display }
    }

    /// An engine with no data.
    pub fn unavailable(reason: impl Into<String>, display: DisplayConfig) -> Self {
        Self {
            state: EngineState::NoData {
                reason: reason.into(),
            },
            display,
        }
    }

    /// Load the configured sources under `root`.
    ///
    /// A required source that fails to load yields the no-data state; the
    /// engine never starts on partial data.
    pub fn from_config(config: &EngineConfig, root: &Path) -> Self {
        match SourceCatalog::load(config, root) {
            Ok(catalog) => {
                info!(sources = catalog.len(), "engine ready");
                Self::new(catalog, config.display.clone())
            }
            Err(err) => {
                error!(error = %err, "record sources unavailable");
                Self::unavailable(err.to_string(), config.display.clone())
            }
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, EngineState::Ready(_))
    }

    pub fn display(&self) -> &DisplayConfig {
        &self.display
    }

    /// The loaded catalog, or `DataUnavailable`.
    pub fn catalog(&self) -> Result<&SourceCatalog> {
        match &self.state {
            EngineState::Ready(catalog) => Ok(catalog),
            EngineState::NoData { reason } => Err(EngineError::DataUnavailable {
                reason: reason.clone(),
            }),
        }
    }

    pub fn list_sources(&self) -> Result<Vec<SourceInfo>> {
        Ok(self
            .catalog()?
            .iter()
            .map(|source| SourceInfo {
                name: source.name().to_string(),
                label: source.label().to_string(),
                rows: source.record_count(),
            })
            .collect())
    }

    /// Combine the named sources into a fresh working table.
    pub fn combine<I, S>(&self, names: I) -> Result<WorkingTable>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        combiner::combine(self.catalog()?, names).ok_or(EngineError::EmptySelection)
    }

    pub fn describe_selection<I, S>(&self, names: I) -> Result<SelectionInfo>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let names: Vec<String> = names
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .collect();
        let selected: Vec<_> = self
            .catalog()?
            .iter()
            .filter(|source| names.iter().any(|name| name == source.name().as_str()))
            .collect();
        if selected.is_empty() {
            return Err(EngineError::EmptySelection);
        }
        Ok(SelectionInfo {
            labels: selected.iter().map(|s| s.label().to_string()).collect(),
            total_rows: selected.iter().map(|s| s.record_count()).sum(),
        })
    }

    /// Filter options for `field`, using the configured faculty label width.
    pub fn domain(&self, field: &str, table: &WorkingTable) -> Vec<FilterOption> {
        filter::domain_with_width(field, table, self.display.faculty_label_width)
    }

    pub fn apply<'a>(&self, table: &'a WorkingTable, selection: &FilterSelection) -> SubView<'a> {
        filter::apply(table, selection)
    }

    pub fn aggregate(&self, view: &SubView<'_>, spec: &AggregationSpec) -> AggregationResult {
        aggregate::aggregate(view, spec)
    }

    pub fn kpis(&self, view: &SubView<'_>) -> KpiSummary {
        kpi::kpis(view, self.display.kpi_label_width)
    }

    /// Risk estimate; available even when no data is loaded.
    pub fn score(&self, profile: &RiskProfile) -> (f64, RiskTier) {
        risk::score(profile)
    }

    pub fn assess(&self, profile: &RiskProfile) -> RiskAssessment {
        risk::assess(profile)
    }
}

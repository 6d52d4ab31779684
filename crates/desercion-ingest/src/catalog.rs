//! The immutable snapshot of loaded record sources.

use std::path::Path;
use std::time::Instant;

use tracing::{info, info_span, warn};

use desercion_model::{RecordSource, SourceName};

use crate::config::{EngineConfig, SourceConfig};
use crate::convert::dataframe_to_source;
use crate::csv::read_csv_table;
use crate::error::{IngestError, Result};

/// Record sources loaded once at startup, in canonical order.
///
/// The catalog is built explicitly and handed to the engine; nothing in the
/// workspace holds it in global state.
#[derive(Debug, Clone, Default)]
pub struct SourceCatalog {
    sources: Vec<RecordSource>,
}

impl SourceCatalog {
    /// Load every configured source from CSV.
    ///
    /// Any required source failing aborts the whole load; optional sources
    /// that fail are logged and skipped.
    pub fn load(config: &EngineConfig, root: &Path) -> Result<Self> {
        config.validate()?;
        let span = info_span!("load_sources", root = %root.display());
        let _guard = span.enter();
        let start = Instant::now();

        let mut sources = Vec::with_capacity(config.sources.len());
        for source_config in &config.sources {
            match load_source(source_config, root) {
                Ok(source) => {
                    info!(
                        source = %source.name(),
                        rows = source.record_count(),
                        columns = source.columns().len(),
                        "loaded source"
                    );
                    sources.push(source);
                }
                Err(error) if !source_config.required => {
                    warn!(source = %source_config.name, %error, "skipping optional source");
                }
                Err(error) => return Err(error),
            }
        }

        info!(
            sources = sources.len(),
            duration_ms = start.elapsed().as_millis(),
            "source catalog ready"
        );
        Ok(Self { sources })
    }

    /// Build a catalog from sources already in memory, keeping their order.
    pub fn from_sources(sources: Vec<RecordSource>) -> Result<Self> {
        for (idx, source) in sources.iter().enumerate() {
            if sources[..idx].iter().any(|s| s.name() == source.name()) {
                return Err(IngestError::DuplicateSource {
                    name: source.name().to_string(),
                });
            }
        }
        Ok(Self { sources })
    }

    pub fn get(&self, name: &str) -> Option<&RecordSource> {
        self.sources.iter().find(|source| source.name().as_str() == name)
    }

    /// Sources in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = &RecordSource> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

fn load_source(config: &SourceConfig, root: &Path) -> Result<RecordSource> {
    let name = SourceName::new(config.name.as_str())?;
    let path = config.resolve_path(root);
    let df = read_csv_table(&path)?;
    dataframe_to_source(&df, name, config.label.as_str())
}

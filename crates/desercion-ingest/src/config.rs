//! Engine configuration.
//!
//! Sources and display limits come from an optional TOML file:
//!
//! ```toml
//! [[sources]]
//! name = "academica"
//! label = "Académica"
//! path = "processed/desercion_academica_clean.csv"
//!
//! [display]
//! top_k = 10
//! ```
//!
//! Omitted sections fall back to [`EngineConfig::default`].

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use desercion_model::{DEFAULT_HISTOGRAM_BINS, DEFAULT_TOP_K};

use crate::error::{IngestError, Result};

/// Environment variable for overriding the data directory.
pub const DATA_DIR_ENV_VAR: &str = "DESERCION_DATA_DIR";

/// Data directory used when neither a flag nor the environment names one.
pub const DEFAULT_DATA_DIR: &str = "data";

/// Full engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Record sources in canonical combination order.
    pub sources: Vec<SourceConfig>,
    pub display: DisplayConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sources: vec![
                SourceConfig::new(
                    "academica",
                    "Académica",
                    "processed/desercion_academica_clean.csv",
                ),
                SourceConfig::new(
                    "no_academica",
                    "No Académica UPTC",
                    "processed/desercion_no_academica_clean.csv",
                ),
                SourceConfig::new("sena", "SENA", "processed/desercion_sena_clean.csv"),
            ],
            display: DisplayConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Rejects configurations with no sources or duplicate source names.
    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(IngestError::NoSources);
        }
        let mut seen = BTreeSet::new();
        for source in &self.sources {
            if !seen.insert(source.name.trim()) {
                return Err(IngestError::DuplicateSource {
                    name: source.name.clone(),
                });
            }
        }
        Ok(())
    }
}

/// One record source declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub name: String,
    /// Value stamped into `dataset_origen` for this source's rows.
    pub label: String,
    /// CSV path, relative to the data root unless absolute.
    pub path: PathBuf,
    /// A required source that fails to load puts the engine in its no-data state.
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

impl SourceConfig {
    pub fn new(name: impl Into<String>, label: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            path: path.into(),
            required: true,
        }
    }

    /// Mark the source optional.
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Resolve the source path against a data root.
    pub fn resolve_path(&self, root: &Path) -> PathBuf {
        if self.path.is_absolute() {
            self.path.clone()
        } else {
            root.join(&self.path)
        }
    }
}

/// Display limits applied by aggregations and renderers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub top_k: usize,
    pub faculty_label_width: usize,
    pub kpi_label_width: usize,
    pub histogram_bins: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            faculty_label_width: 50,
            kpi_label_width: 30,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(text: &str, origin: &Path) -> Result<EngineConfig> {
    let config: EngineConfig = toml::from_str(text).map_err(|e| IngestError::ConfigParse {
        path: origin.to_path_buf(),
        source: e,
    })?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<EngineConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| IngestError::ConfigRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    parse_config(&text, path)
}

/// Get the data root directory.
///
/// Resolution order:
/// 1. explicit override (the `--data-dir` flag)
/// 2. `DESERCION_DATA_DIR` environment variable
/// 3. `./data`
pub fn resolve_data_root(explicit: Option<&Path>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir.to_path_buf();
    }
    if let Ok(root) = std::env::var(DATA_DIR_ENV_VAR)
        && !root.trim().is_empty()
    {
        return PathBuf::from(root);
    }
    PathBuf::from(DEFAULT_DATA_DIR)
}

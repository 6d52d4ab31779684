//! Record source loading for the attrition analytics engine.
//!
//! This crate turns configured CSV exports into the immutable
//! [`SourceCatalog`] the engine is constructed from:
//!
//! - **config**: TOML engine configuration and data-root resolution
//! - **discovery**: CSV file listing and source discovery
//! - **csv**: size and encoding checks, Polars CSV reading
//! - **convert**: DataFrame to tagged records
//! - **catalog**: the loaded snapshot, required/optional load policy

pub mod catalog;
pub mod config;
pub mod convert;
pub mod csv;
pub mod discovery;
pub mod error;

// === Catalog ===
pub use catalog::SourceCatalog;

// === Configuration ===
pub use config::{
    DATA_DIR_ENV_VAR, DEFAULT_DATA_DIR, DisplayConfig, EngineConfig, SourceConfig, load_config,
    parse_config, resolve_data_root,
};

// === Loading ===
pub use convert::{any_to_field_value, dataframe_to_source};
pub use csv::{MAX_CSV_FILE_SIZE, read_csv_table};
pub use discovery::{discover_sources, list_csv_files, source_name_from_path};

// === Errors ===
pub use error::{IngestError, Result};

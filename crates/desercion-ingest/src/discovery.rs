//! Source discovery for data folders.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::SourceConfig;
use crate::error::{IngestError, Result};

/// Lists all CSV files in a directory.
///
/// Returns files sorted by filename.
pub fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut files = Vec::new();

    let entries = std::fs::read_dir(dir).map_err(|e| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source: e,
    })?;

    for entry_result in entries {
        let entry = entry_result.map_err(|e| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));

        if is_csv {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

/// Derives a source name from a cleaned export filename.
///
/// `desercion_sena_clean.csv` becomes `sena`; other stems are kept as-is.
pub fn source_name_from_path(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let name = stem.strip_prefix("desercion_").unwrap_or(stem);
    let name = name.strip_suffix("_clean").unwrap_or(name);
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

/// Declares one optional source per CSV file in `dir`, ordered by filename.
///
/// Discovered sources use their derived name as label and a path relative
/// to `dir`, so they resolve against it as data root.
pub fn discover_sources(dir: &Path) -> Result<Vec<SourceConfig>> {
    let files = list_csv_files(dir)?;
    let sources: Vec<SourceConfig> = files
        .into_iter()
        .filter_map(|path| {
            let name = source_name_from_path(&path)?;
            let file = PathBuf::from(path.file_name()?);
            Some(SourceConfig::new(name.clone(), name, file).optional())
        })
        .collect();
    debug!(dir = %dir.display(), sources = sources.len(), "discovered sources");
    Ok(sources)
}

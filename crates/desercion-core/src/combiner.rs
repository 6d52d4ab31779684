//! Union of the selected record sources into one working table.

use std::collections::BTreeSet;

use tracing::{debug, debug_span};

use desercion_ingest::SourceCatalog;
use desercion_model::fields::DATASET_ORIGEN;
use desercion_model::{FieldName, FieldValue, WorkingTable};

/// Combine the selected sources.
///
/// Sources are concatenated in catalog order regardless of selection order;
/// every row is copied and stamped with its source label under
/// `dataset_origen`. Unknown names are ignored. Returns `None` when nothing
/// known is selected.
pub fn combine<I, S>(catalog: &SourceCatalog, selected: I) -> Option<WorkingTable>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let selected: BTreeSet<String> = selected
        .into_iter()
        .map(|name| name.as_ref().trim().to_string())
        .collect();
    let span = debug_span!("combine", selected = selected.len());
    let _guard = span.enter();

    let chosen: Vec<_> = catalog
        .iter()
        .filter(|source| selected.contains(source.name().as_str()))
        .collect();
    if chosen.is_empty() {
        debug!("no known source selected");
        return None;
    }

    // Column union in first-seen order, origin tag last.
    let origin = FieldName::new(DATASET_ORIGEN).ok()?;
    let mut columns: Vec<FieldName> = Vec::new();
    for source in &chosen {
        for column in source.columns() {
            if *column != origin && !columns.contains(column) {
                columns.push(column.clone());
            }
        }
    }
    columns.push(origin.clone());

    let total: usize = chosen.iter().map(|source| source.record_count()).sum();
    let mut rows = Vec::with_capacity(total);
    for source in &chosen {
        let label = FieldValue::text(source.label());
        rows.extend(source.records().iter().map(|record| {
            let mut row = record.clone();
            row.insert(origin.clone(), label.clone());
            row
        }));
    }

    debug!(sources = chosen.len(), rows = rows.len(), "combined sources");
    Some(WorkingTable::new(columns, rows))
}

//! Headline figures for the overview.

use desercion_common::truncate_label;
use desercion_model::fields::{EDAD, GENERO, NOMBRE_FACULTAD};
use desercion_model::{AggregationResult, AggregationSpec, FrequencySpec, KpiSummary, SubView};

use crate::aggregate::aggregate;
use crate::stats::summarize;

/// Default display width of the top faculty label.
pub const DEFAULT_KPI_LABEL_WIDTH: usize = 30;

/// Total rows, mean age, dominant gender and the faculty with most records.
///
/// Modes break ties by first appearance. Absent fields leave their figure
/// unset.
pub fn kpis(view: &SubView<'_>, label_width: usize) -> KpiSummary {
    let mean_age = view
        .has_field(EDAD)
        .then(|| {
            let ages: Vec<f64> = view.records().filter_map(|row| row.value(EDAD).as_f64()).collect();
            summarize(&ages).map(|summary| summary.mean)
        })
        .flatten();

    KpiSummary {
        total_records: view.len(),
        mean_age,
        dominant_gender: mode(view, GENERO),
        critical_faculty: mode(view, NOMBRE_FACULTAD).map(|name| truncate_label(&name, label_width)),
    }
}

fn mode(view: &SubView<'_>, field: &str) -> Option<String> {
    let spec = FrequencySpec::all(field).with_top_k(1);
    match aggregate(view, &AggregationSpec::Frequency(spec)) {
        AggregationResult::Frequency(table) => {
            table.entries.into_iter().next().map(|entry| entry.key)
        }
        _ => None,
    }
}

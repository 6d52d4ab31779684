//! Table renderers: aggregated result in, comfy-table out.
//!
//! Renderers never compute anything beyond display formatting; every figure
//! comes from the engine.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use desercion_common::{format_numeric, truncate_label};
use desercion_core::{SelectionInfo, SourceInfo};
use desercion_model::{
    AggregationResult, CompletenessReport, CrossTab, FilterOption, FrequencyTable, GroupSummary,
    HistogramBin, KpiSummary, NumericSummary, RiskAssessment, RiskTier,
};

/// Width of faculty labels in result tables.
pub const TABLE_LABEL_WIDTH: usize = 60;

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn styled_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.set_header(headers.iter().map(|h| header_cell(h)).collect::<Vec<_>>());
    apply_table_style(&mut table);
    table
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn number_cell(value: f64) -> Cell {
    Cell::new(format_decimal(value)).set_alignment(CellAlignment::Right)
}

fn count_cell(count: usize) -> Cell {
    if count == 0 {
        dim_cell(0).set_alignment(CellAlignment::Right)
    } else {
        Cell::new(format_count(count)).set_alignment(CellAlignment::Right)
    }
}

/// Thousands-separated count, e.g. `3,372`.
pub fn format_count(count: usize) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Two-decimal rendering without trailing zeros.
pub fn format_decimal(value: f64) -> String {
    format_numeric((value * 100.0).round() / 100.0)
}

/// One-line description of a dataset selection.
pub fn selection_line(info: &SelectionInfo) -> String {
    format!(
        "Datasets: {} ({} registros)",
        info.labels.join(" + "),
        format_count(info.total_rows)
    )
}

pub fn sources_table(sources: &[SourceInfo]) -> Table {
    let mut table = styled_table(&["Dataset", "Origen", "Registros"]);
    for source in sources {
        table.add_row(vec![
            Cell::new(&source.name),
            Cell::new(&source.label),
            count_cell(source.rows),
        ]);
    }
    table
}

pub fn kpi_table(kpis: &KpiSummary) -> Table {
    let mut table = styled_table(&["Indicador", "Valor"]);
    let or_dash = |value: Option<String>| value.map_or_else(|| dim_cell("-"), Cell::new);
    table.add_row(vec![Cell::new("Total registros"), count_cell(kpis.total_records)]);
    table.add_row(vec![
        Cell::new("Edad promedio"),
        or_dash(kpis.mean_age.map(|age| format!("{age:.1}"))),
    ]);
    table.add_row(vec![
        Cell::new("Género predominante"),
        or_dash(kpis.dominant_gender.clone()),
    ]);
    table.add_row(vec![
        Cell::new("Facultad con más registros"),
        or_dash(kpis.critical_faculty.clone()),
    ]);
    table
}

pub fn domain_table(field: &str, options: &[FilterOption]) -> Table {
    let mut table = styled_table(&[field, "Valor"]);
    for option in options {
        table.add_row(vec![Cell::new(&option.label), dim_cell(option.value.as_str())]);
    }
    table
}

pub fn frequency_table(frequency: &FrequencyTable) -> Table {
    let total = frequency.total();
    let mut table = styled_table(&[frequency.field.as_str(), "Registros", "%"]);
    for entry in &frequency.entries {
        let share = if total == 0 {
            0.0
        } else {
            entry.count as f64 * 100.0 / total as f64
        };
        table.add_row(vec![
            Cell::new(truncate_label(&entry.label, TABLE_LABEL_WIDTH)),
            count_cell(entry.count),
            number_cell(share),
        ]);
    }
    table
}

pub fn cross_tab_table(tab: &CrossTab) -> Table {
    let mut headers = vec![format!("{} \\ {}", tab.row_field, tab.column_field)];
    headers.extend(tab.column_keys.iter().cloned());
    let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();
    let mut table = styled_table(&header_refs);
    for (row_key, counts) in tab.row_keys.iter().zip(&tab.cells) {
        let mut row = vec![Cell::new(truncate_label(row_key, TABLE_LABEL_WIDTH))];
        row.extend(counts.iter().map(|count| count_cell(*count)));
        table.add_row(row);
    }
    table
}

const SUMMARY_HEADERS: [&str; 8] = ["n", "media", "desv.", "mín", "25%", "50%", "75%", "máx"];

fn summary_cells(summary: &NumericSummary) -> Vec<Cell> {
    vec![
        count_cell(summary.count),
        number_cell(summary.mean),
        summary.std.map_or_else(|| dim_cell("-"), number_cell),
        number_cell(summary.min),
        number_cell(summary.q1),
        number_cell(summary.median),
        number_cell(summary.q3),
        number_cell(summary.max),
    ]
}

pub fn numeric_summary_table(field: &str, summary: Option<&NumericSummary>) -> Table {
    let mut headers = vec![field];
    headers.extend(SUMMARY_HEADERS);
    let mut table = styled_table(&headers);
    if let Some(summary) = summary {
        let mut row = vec![Cell::new(field)];
        row.extend(summary_cells(summary));
        table.add_row(row);
    }
    table
}

pub fn grouped_summary_table(group: &str, groups: &[GroupSummary]) -> Table {
    let mut headers = vec![group];
    headers.extend(SUMMARY_HEADERS);
    let mut table = styled_table(&headers);
    for group in groups {
        let mut row = vec![Cell::new(&group.key)];
        row.extend(summary_cells(&group.summary));
        table.add_row(row);
    }
    table
}

pub fn histogram_table(field: &str, bins: &[HistogramBin]) -> Table {
    let peak = bins.iter().map(|bin| bin.count).max().unwrap_or(0);
    let mut table = styled_table(&[field, "Registros", ""]);
    for bin in bins {
        let bar_len = if peak == 0 { 0 } else { bin.count * 30 / peak };
        table.add_row(vec![
            Cell::new(format!(
                "[{}, {})",
                format_decimal(bin.lower),
                format_decimal(bin.upper)
            )),
            count_cell(bin.count),
            Cell::new("█".repeat(bar_len)).fg(Color::Green),
        ]);
    }
    table
}

pub fn completeness_table(report: &CompletenessReport) -> Table {
    let mut table = styled_table(&["Campo", "Con dato", "%"]);
    for field in &report.fields {
        table.add_row(vec![
            Cell::new(&field.field),
            count_cell(field.non_missing),
            number_cell(field.percent),
        ]);
    }
    if let Some(average) = report.average_percent {
        table.add_row(vec![
            Cell::new("Completitud promedio")
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
            dim_cell("-"),
            number_cell(average).add_attribute(Attribute::Bold),
        ]);
    }
    table
}

/// Render any aggregation result.
pub fn result_table(result: &AggregationResult) -> Table {
    match result {
        AggregationResult::Frequency(frequency) => frequency_table(frequency),
        AggregationResult::CrossTab(tab) => cross_tab_table(tab),
        AggregationResult::NumericSummary { field, summary } => {
            numeric_summary_table(field, summary.as_ref())
        }
        AggregationResult::GroupedSummary { group, groups, .. } => {
            grouped_summary_table(group, groups)
        }
        AggregationResult::Histogram { field, bins } => histogram_table(field, bins),
        AggregationResult::Completeness(report) => completeness_table(report),
    }
}

fn tier_color(tier: RiskTier) -> Color {
    match tier {
        RiskTier::Low => Color::Green,
        RiskTier::Medium => Color::Yellow,
        RiskTier::High => Color::DarkYellow,
        RiskTier::Critical => Color::Red,
    }
}

pub fn assessment_table(assessment: &RiskAssessment) -> Table {
    let mut table = styled_table(&["Factor", "Peso", "Activo"]);
    for factor in &assessment.factors {
        let active = if factor.triggered {
            Cell::new("sí").fg(Color::Yellow)
        } else {
            dim_cell("no")
        };
        table.add_row(vec![
            Cell::new(factor.kind.description()),
            Cell::new(factor.weight).set_alignment(CellAlignment::Right),
            active,
        ]);
    }
    table.add_row(vec![
        Cell::new(format!(
            "Probabilidad {:.0}%",
            assessment.probability * 100.0
        ))
        .add_attribute(Attribute::Bold),
        Cell::new(assessment.score)
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Bold),
        Cell::new(assessment.tier.as_str())
            .fg(tier_color(assessment.tier))
            .add_attribute(Attribute::Bold),
    ]);
    table
}

/// Recommendation lines for an assessment, one per action.
pub fn recommendation_lines(assessment: &RiskAssessment) -> Vec<String> {
    assessment
        .recommendations
        .iter()
        .map(|action| format!("- {}", action.description()))
        .collect()
}

//! Grouped counts, cross-tabulations and descriptive statistics.
//!
//! Every aggregation is a pure function of a subview and a request. An
//! empty subview, or a field the table lacks, yields an empty result of the
//! requested kind.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use tracing::{debug, debug_span};

use desercion_common::{parse_f64, truncate_label};
use desercion_model::fields::ESTRATO;
use desercion_model::{
    AggregationResult, AggregationSpec, CompletenessReport, CrossTab, FieldCompleteness,
    FrequencyEntry, FrequencyOrder, FrequencySpec, FrequencyTable, GroupSummary, SubView,
};

use crate::stats::{histogram, summarize};

/// Compute one aggregation over a subview.
pub fn aggregate(view: &SubView<'_>, spec: &AggregationSpec) -> AggregationResult {
    let span = debug_span!("aggregate", rows = view.len());
    let _guard = span.enter();

    let result = match spec {
        AggregationSpec::Frequency(frequency) => {
            AggregationResult::Frequency(frequency_table(view, frequency))
        }
        AggregationSpec::StratumDistribution => {
            AggregationResult::Frequency(stratum_distribution(view))
        }
        AggregationSpec::CrossTab {
            rows,
            columns,
            top_rows,
        } => AggregationResult::CrossTab(cross_tab(view, rows, columns, *top_rows)),
        AggregationSpec::NumericSummary { field } => AggregationResult::NumericSummary {
            field: field.clone(),
            summary: summarize(&numeric_values(view, field)),
        },
        AggregationSpec::GroupedSummary { group, value } => AggregationResult::GroupedSummary {
            group: group.clone(),
            value: value.clone(),
            groups: grouped_summary(view, group, value),
        },
        AggregationSpec::Histogram { field, bins } => AggregationResult::Histogram {
            field: field.clone(),
            bins: histogram(&numeric_values(view, field), *bins),
        },
        AggregationSpec::Completeness => AggregationResult::Completeness(completeness(view)),
    };

    debug!(entries = result.len(), "aggregation computed");
    result
}

/// Distinct keys with their counts, in first-encountered order.
fn count_keys(keys: impl Iterator<Item = Option<String>>) -> Vec<(String, usize)> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<(String, usize)> = Vec::new();
    for key in keys.flatten() {
        match positions.get(&key) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                positions.insert(key.clone(), counts.len());
                counts.push((key, 1));
            }
        }
    }
    counts
}

/// Numeric keys first in numeric order, then text keys in text order.
fn compare_keys(a: &str, b: &str) -> Ordering {
    match (parse_f64(a), parse_f64(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}

fn frequency_table(view: &SubView<'_>, spec: &FrequencySpec) -> FrequencyTable {
    if !view.has_field(&spec.field) {
        debug!(field = %spec.field, "frequency on absent field");
        return FrequencyTable::empty(&spec.field);
    }

    let mut counts = count_keys(view.records().map(|row| row.value(&spec.field).key()));
    match spec.order {
        // Stable: equal counts keep first-encountered order.
        FrequencyOrder::CountDescending => counts.sort_by(|a, b| b.1.cmp(&a.1)),
        FrequencyOrder::KeyAscending => counts.sort_by(|a, b| compare_keys(&a.0, &b.0)),
    }
    if let Some(k) = spec.top_k {
        counts.truncate(k);
    }

    let entries = counts
        .into_iter()
        .map(|(key, count)| FrequencyEntry {
            label: match spec.label_width {
                Some(width) => truncate_label(&key, width),
                None => key.clone(),
            },
            key,
            count,
        })
        .collect();
    FrequencyTable {
        field: spec.field.clone(),
        entries,
    }
}

fn stratum_distribution(view: &SubView<'_>) -> FrequencyTable {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for stratum in view.records().filter_map(|row| row.value(ESTRATO).as_stratum()) {
        *counts.entry(stratum).or_default() += 1;
    }
    FrequencyTable {
        field: ESTRATO.to_string(),
        entries: counts
            .into_iter()
            .map(|(stratum, count)| FrequencyEntry {
                key: stratum.to_string(),
                label: format!("Estrato {stratum}"),
                count,
            })
            .collect(),
    }
}

fn cross_tab(view: &SubView<'_>, rows: &str, columns: &str, top_rows: Option<usize>) -> CrossTab {
    if !view.has_field(rows) || !view.has_field(columns) {
        debug!(rows, columns, "cross-tab on absent field");
        return CrossTab::empty(rows, columns);
    }

    let keep: Option<BTreeSet<String>> = top_rows.map(|k| {
        let mut counts = count_keys(view.records().map(|row| row.value(rows).key()));
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts.into_iter().take(k).map(|(key, _)| key).collect()
    });

    let mut pairs: BTreeMap<(String, String), usize> = BTreeMap::new();
    let mut row_keys = BTreeSet::new();
    let mut column_keys = BTreeSet::new();
    for record in view.records() {
        let (Some(row_key), Some(column_key)) = (record.value(rows).key(), record.value(columns).key())
        else {
            continue;
        };
        if keep.as_ref().is_some_and(|keep| !keep.contains(&row_key)) {
            continue;
        }
        row_keys.insert(row_key.clone());
        column_keys.insert(column_key.clone());
        *pairs.entry((row_key, column_key)).or_default() += 1;
    }

    let row_keys: Vec<String> = row_keys.into_iter().collect();
    let column_keys: Vec<String> = column_keys.into_iter().collect();
    let cells = row_keys
        .iter()
        .map(|row_key| {
            column_keys
                .iter()
                .map(|column_key| {
                    pairs
                        .get(&(row_key.clone(), column_key.clone()))
                        .copied()
                        .unwrap_or(0)
                })
                .collect()
        })
        .collect();

    CrossTab {
        row_field: rows.to_string(),
        column_field: columns.to_string(),
        row_keys,
        column_keys,
        cells,
    }
}

fn numeric_values(view: &SubView<'_>, field: &str) -> Vec<f64> {
    if !view.has_field(field) {
        debug!(field, "numeric aggregation on absent field");
        return Vec::new();
    }
    view.records()
        .filter_map(|row| row.value(field).as_f64())
        .collect()
}

fn grouped_summary(view: &SubView<'_>, group: &str, value: &str) -> Vec<GroupSummary> {
    if !view.has_field(group) || !view.has_field(value) {
        debug!(group, value, "grouped summary on absent field");
        return Vec::new();
    }

    let mut samples: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for record in view.records() {
        if let (Some(key), Some(number)) = (record.value(group).key(), record.value(value).as_f64()) {
            samples.entry(key).or_default().push(number);
        }
    }

    samples
        .into_iter()
        .filter_map(|(key, values)| {
            summarize(&values).map(|summary| GroupSummary { key, summary })
        })
        .collect()
}

fn completeness(view: &SubView<'_>) -> CompletenessReport {
    let total_rows = view.len();
    if total_rows == 0 {
        return CompletenessReport::empty();
    }

    let fields: Vec<FieldCompleteness> = view
        .columns()
        .iter()
        .map(|field| {
            let non_missing = view
                .records()
                .filter(|row| !row.is_missing(field.as_str()))
                .count();
            FieldCompleteness {
                field: field.to_string(),
                non_missing,
                percent: non_missing as f64 * 100.0 / total_rows as f64,
            }
        })
        .collect();

    let average_percent = (!fields.is_empty())
        .then(|| fields.iter().map(|f| f.percent).sum::<f64>() / fields.len() as f64);

    CompletenessReport {
        total_rows,
        fields,
        average_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use desercion_model::{FieldName, FieldValue, Record, WorkingTable};

    fn table(columns: &[&str], rows: Vec<Vec<FieldValue>>) -> WorkingTable {
        let names: Vec<FieldName> = columns.iter().map(|c| FieldName::new(*c).unwrap()).collect();
        let records = rows
            .into_iter()
            .map(|values| {
                let mut record = Record::new();
                for (name, value) in names.iter().zip(values) {
                    record.insert(name.clone(), value);
                }
                record
            })
            .collect();
        WorkingTable::new(names, records)
    }

    fn people() -> WorkingTable {
        table(
            &["genero", "estrato", "edad", "modalidad"],
            vec![
                vec!["F".into(), "2".into(), 19_i64.into(), "PRESENCIAL".into()],
                vec!["M".into(), "SIN INFORMACION".into(), 24_i64.into(), "VIRTUAL".into()],
                vec!["M".into(), "1".into(), FieldValue::Missing, "VIRTUAL".into()],
                vec!["F".into(), "2.0".into(), 33_i64.into(), "PRESENCIAL".into()],
                vec![FieldValue::Missing, "3".into(), 21_i64.into(), "DISTANCIA".into()],
            ],
        )
    }

    #[test]
    fn frequency_ties_keep_first_seen_order() {
        let table = people();
        let result = aggregate(&table.view(), &AggregationSpec::Frequency(FrequencySpec::all("genero")));
        let AggregationResult::Frequency(freq) = result else {
            panic!("expected frequency");
        };
        let keys: Vec<&str> = freq.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["F", "M"]);
        assert_eq!(freq.total(), 4);
    }

    #[test]
    fn key_order_puts_numbers_before_text() {
        let mut rows = Vec::new();
        for n in 0..200_i64 {
            rows.push(vec![FieldValue::Integer(2000 + n % 25)]);
            rows.push(vec![format!("{}a", n % 30).into()]);
            rows.push(vec![format!("{}-1", 2000 + n % 20).into()]);
        }
        let table = table(&["periodo_año"], rows);
        let spec = AggregationSpec::Frequency(FrequencySpec::by_key("periodo_año"));
        let AggregationResult::Frequency(freq) = aggregate(&table.view(), &spec) else {
            panic!("expected frequency");
        };

        let keys: Vec<&str> = freq.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys.len(), 25 + 30 + 20);
        assert_eq!(keys[0], "2000");
        assert_eq!(keys[24], "2024");
        assert!(keys[25..].iter().all(|k| parse_f64(k).is_none()));
        assert!(keys[25..].windows(2).all(|w| w[0] < w[1]));
        assert_eq!(freq.total(), 600);
    }

    #[test]
    fn compare_keys_is_consistent_across_kinds() {
        assert_eq!(compare_keys("2", "10"), Ordering::Less);
        assert_eq!(compare_keys("10", "1a"), Ordering::Less);
        assert_eq!(compare_keys("2", "1a"), Ordering::Less);
        assert_eq!(compare_keys("2.0", "2"), Ordering::Greater);
        assert_eq!(compare_keys("2020-1", "2021"), Ordering::Greater);
    }

    #[test]
    fn top_faculty_labels_are_truncated_but_keys_kept() {
        let long = "FACULTAD DE CIENCIAS DE LA EDUCACION Y HUMANIDADES APLICADAS";
        let table = table(
            &["nombre_facultad"],
            vec![
                vec![long.into()],
                vec![long.into()],
                vec!["FACULTAD DE SALUD".into()],
            ],
        );
        let spec = FrequencySpec::top("nombre_facultad").with_label_width(40);
        let AggregationResult::Frequency(freq) =
            aggregate(&table.view(), &AggregationSpec::Frequency(spec))
        else {
            panic!("expected frequency");
        };

        assert_eq!(freq.entries[0].key, long);
        assert_eq!(freq.entries[0].count, 2);
        assert_eq!(freq.entries[0].label, format!("{}...", &long[..40]));
        assert_eq!(freq.entries[1].label, "FACULTAD DE SALUD");
    }

    #[test]
    fn stratum_distribution_skips_sentinels() {
        let table = people();
        let result = aggregate(&table.view(), &AggregationSpec::StratumDistribution);
        let AggregationResult::Frequency(freq) = result else {
            panic!("expected frequency");
        };
        let labels: Vec<(&str, usize)> = freq
            .entries
            .iter()
            .map(|e| (e.label.as_str(), e.count))
            .collect();
        assert_eq!(labels, vec![("Estrato 1", 1), ("Estrato 2", 2), ("Estrato 3", 1)]);
    }

    #[test]
    fn cross_tab_fills_missing_combinations_with_zero() {
        let table = people();
        let spec = AggregationSpec::CrossTab {
            rows: "modalidad".into(),
            columns: "genero".into(),
            top_rows: None,
        };
        let AggregationResult::CrossTab(tab) = aggregate(&table.view(), &spec) else {
            panic!("expected cross tab");
        };
        assert_eq!(tab.row_keys, vec!["PRESENCIAL", "VIRTUAL"]);
        assert_eq!(tab.column_keys, vec!["F", "M"]);
        assert_eq!(tab.get("PRESENCIAL", "F"), 2);
        assert_eq!(tab.get("VIRTUAL", "F"), 0);
        assert_eq!(tab.get("DISTANCIA", "F"), 0);
    }

    #[test]
    fn cross_tab_top_rows_keeps_most_frequent() {
        let table = people();
        let spec = AggregationSpec::CrossTab {
            rows: "modalidad".into(),
            columns: "genero".into(),
            top_rows: Some(1),
        };
        let AggregationResult::CrossTab(tab) = aggregate(&table.view(), &spec) else {
            panic!("expected cross tab");
        };
        assert_eq!(tab.row_keys, vec!["PRESENCIAL"]);
    }

    #[test]
    fn grouped_summary_per_key() {
        let table = people();
        let spec = AggregationSpec::GroupedSummary {
            group: "modalidad".into(),
            value: "edad".into(),
        };
        let AggregationResult::GroupedSummary { groups, .. } = aggregate(&table.view(), &spec) else {
            panic!("expected grouped summary");
        };
        let keys: Vec<(&str, usize)> = groups
            .iter()
            .map(|g| (g.key.as_str(), g.summary.count))
            .collect();
        assert_eq!(keys, vec![("DISTANCIA", 1), ("PRESENCIAL", 2), ("VIRTUAL", 1)]);
        assert_eq!(groups[1].summary.mean, 26.0);
    }

    #[test]
    fn completeness_averages_field_percentages() {
        let table = people();
        let AggregationResult::Completeness(report) =
            aggregate(&table.view(), &AggregationSpec::Completeness)
        else {
            panic!("expected completeness");
        };
        assert_eq!(report.total_rows, 5);
        let percents: Vec<f64> = report.fields.iter().map(|f| f.percent).collect();
        assert_eq!(percents, vec![80.0, 100.0, 80.0, 100.0]);
        assert_eq!(report.average_percent, Some(90.0));
    }

    #[test]
    fn absent_fields_give_empty_results() {
        let table = people();
        let view = table.view();
        let specs = [
            AggregationSpec::Frequency(FrequencySpec::top("nombre_facultad")),
            AggregationSpec::NumericSummary {
                field: "periodo_año".into(),
            },
            AggregationSpec::CrossTab {
                rows: "jornada".into(),
                columns: "genero".into(),
                top_rows: None,
            },
        ];
        for spec in &specs {
            assert!(aggregate(&view, spec).is_empty());
        }
    }
}

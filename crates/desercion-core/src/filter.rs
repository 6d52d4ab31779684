//! Filter option domains and filtered subviews.
//!
//! Domains are always derived from the table a filter is applied to, never
//! from a previously filtered view. A selection that does not match the
//! current domain, or names a field the table lacks, is ignored.

use std::collections::BTreeSet;

use tracing::{debug, debug_span};

use desercion_common::{coerce_stratum, truncate_label};
use desercion_model::fields::{EDAD, ESTRATO, NOMBRE_FACULTAD};
use desercion_model::{AgeBucket, FilterOption, FilterSelection, FilterValue, Record, SubView, WorkingTable};

/// Label of the leading "no filter" option.
pub const ALL_LABEL: &str = "Todos";

/// Display width of faculty option labels.
pub const DEFAULT_LABEL_WIDTH: usize = 50;

/// How a field is matched by its filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    /// Fixed age buckets over the coerced numeric age.
    AgeBucket,
    /// Integer stratum coerced with `int(float(value))`.
    Stratum,
    /// Exact match on the value key.
    Categorical,
}

impl FieldKind {
    fn of(field: &str) -> Self {
        match field {
            EDAD => Self::AgeBucket,
            ESTRATO => Self::Stratum,
            _ => Self::Categorical,
        }
    }
}

/// Option domain for `field` with the default label width.
pub fn domain_for(field: &str, table: &WorkingTable) -> Vec<FilterOption> {
    domain_with_width(field, table, DEFAULT_LABEL_WIDTH)
}

/// Option domain for `field`: the "all" option first, then the field's
/// distinct values.
///
/// - `edad` offers the fixed age buckets.
/// - `estrato` offers every coercible stratum ascending, labelled
///   `Estrato N`; sentinel text never becomes an option.
/// - Any other field offers its distinct non-missing values sorted
///   lexicographically. Faculty labels are truncated to `label_width`
///   characters while the value keeps the full name.
pub fn domain_with_width(field: &str, table: &WorkingTable, label_width: usize) -> Vec<FilterOption> {
    let mut options = vec![FilterOption::all(ALL_LABEL)];
    match FieldKind::of(field) {
        FieldKind::AgeBucket => {
            options.extend(
                AgeBucket::ALL
                    .into_iter()
                    .map(|bucket| FilterOption::value(bucket.label(), bucket.token())),
            );
        }
        FieldKind::Stratum => {
            options.extend(stratum_values(table).into_iter().map(|stratum| {
                FilterOption::value(format!("Estrato {stratum}"), stratum.to_string())
            }));
        }
        FieldKind::Categorical => {
            let truncate = field == NOMBRE_FACULTAD;
            options.extend(categorical_values(field, table).into_iter().map(|value| {
                let label = if truncate {
                    truncate_label(&value, label_width)
                } else {
                    value.clone()
                };
                FilterOption::value(label, value)
            }));
        }
    }
    options
}

fn stratum_values(table: &WorkingTable) -> BTreeSet<i64> {
    table
        .rows()
        .iter()
        .filter_map(|row| row.value(ESTRATO).as_stratum())
        .collect()
}

fn categorical_values(field: &str, table: &WorkingTable) -> BTreeSet<String> {
    table
        .rows()
        .iter()
        .filter_map(|row| row.value(field).key())
        .collect()
}

/// A selection resolved against the current domain.
enum Predicate {
    Bucket(AgeBucket),
    Stratum(i64),
    Equals(String),
}

impl Predicate {
    fn matches(&self, field: &str, row: &Record) -> bool {
        let value = row.value(field);
        match self {
            Self::Bucket(bucket) => value.as_f64().is_some_and(|age| bucket.contains(age)),
            Self::Stratum(stratum) => value.as_stratum() == Some(*stratum),
            Self::Equals(expected) => value.key().as_deref() == Some(expected.as_str()),
        }
    }
}

/// Resolve one selection, or `None` when it must be ignored.
fn resolve(field: &str, value: &FilterValue, table: &WorkingTable) -> Option<Predicate> {
    let FilterValue::Value(raw) = value else {
        return None;
    };
    if !table.has_field(field) {
        debug!(field, "filter on absent field ignored");
        return None;
    }
    let predicate = match FieldKind::of(field) {
        FieldKind::AgeBucket => AgeBucket::from_token(raw).map(Predicate::Bucket),
        FieldKind::Stratum => coerce_stratum(raw)
            .filter(|stratum| stratum_values(table).contains(stratum))
            .map(Predicate::Stratum),
        FieldKind::Categorical => categorical_values(field, table)
            .contains(raw.as_str())
            .then(|| Predicate::Equals(raw.clone())),
    };
    if predicate.is_none() {
        debug!(field, "out-of-domain filter value ignored");
    }
    predicate
}

/// Apply every non-"all" selection to the whole table.
pub fn apply<'a>(table: &'a WorkingTable, selection: &FilterSelection) -> SubView<'a> {
    apply_to_view(&table.view(), selection)
}

/// Narrow an existing view by a selection, left to right.
///
/// Domains are checked against the view's underlying table.
pub fn apply_to_view<'a>(view: &SubView<'a>, selection: &FilterSelection) -> SubView<'a> {
    let span = debug_span!("apply", filters = selection.len(), rows_in = view.len());
    let _guard = span.enter();

    let table = view.table();
    let mut current = view.clone();
    for (field, value) in selection.iter() {
        if let Some(predicate) = resolve(field, value, table) {
            current = current.retain(|row| predicate.matches(field, row));
        }
    }

    debug!(rows_out = current.len(), "filters applied");
    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use desercion_model::{FieldName, FieldValue};

    fn table(rows: &[&[(&str, FieldValue)]]) -> WorkingTable {
        let records: Vec<Record> = rows
            .iter()
            .map(|pairs| Record::from_pairs(pairs.iter().map(|(k, v)| (*k, v.clone()))).unwrap())
            .collect();
        let mut columns: Vec<FieldName> = Vec::new();
        for record in &records {
            for field in record.cells.keys() {
                if !columns.contains(field) {
                    columns.push(field.clone());
                }
            }
        }
        WorkingTable::new(columns, records)
    }

    fn sample() -> WorkingTable {
        table(&[
            &[("edad", 19_i64.into()), ("estrato", "2".into()), ("genero", "F".into())],
            &[("edad", 24_i64.into()), ("estrato", "SIN INFORMACION".into()), ("genero", "M".into())],
            &[("edad", 31.0_f64.into()), ("estrato", "2.0".into()), ("genero", "M".into())],
            &[("edad", "n/a".into()), ("estrato", "1".into()), ("genero", FieldValue::Missing)],
        ])
    }

    fn values(options: &[FilterOption]) -> Vec<&str> {
        options.iter().map(|o| o.value.as_str()).collect()
    }

    #[test]
    fn stratum_domain_excludes_sentinels() {
        let options = domain_for("estrato", &sample());
        assert_eq!(values(&options), vec!["all", "1", "2"]);
        assert_eq!(options[1].label, "Estrato 1");
        assert_eq!(options[0].label, ALL_LABEL);
    }

    #[test]
    fn age_domain_is_fixed_buckets() {
        let options = domain_for("edad", &sample());
        assert_eq!(values(&options), vec!["all", "16-20", "21-25", "26-30", "31+"]);
        assert_eq!(options[4].label, "31+ años");
    }

    #[test]
    fn categorical_domain_is_sorted_and_distinct() {
        let options = domain_for("genero", &sample());
        assert_eq!(values(&options), vec!["all", "F", "M"]);
        assert_eq!(values(&domain_for("jornada", &sample())), vec!["all"]);
    }

    #[test]
    fn faculty_labels_truncate_but_values_do_not() {
        let long = "FACULTAD DE CIENCIAS DE LA EDUCACION Y HUMANIDADES DE TUNJA";
        let table = table(&[&[("nombre_facultad", long.into())]]);
        let options = domain_with_width("nombre_facultad", &table, 50);
        assert_eq!(options[1].value.as_str(), long);
        assert_eq!(options[1].label.chars().count(), 53);
        assert!(options[1].label.ends_with("..."));
    }

    #[test]
    fn stratum_filter_matches_coerced_values() {
        let table = sample();
        let view = apply(&table, &FilterSelection::new().with_value("estrato", "2"));
        assert_eq!(view.indices(), &[0, 2]);
    }

    #[test]
    fn age_filter_skips_non_numeric_rows_only_for_that_filter() {
        let table = sample();
        let view = apply(&table, &FilterSelection::new().with_value("edad", "31+"));
        assert_eq!(view.indices(), &[2]);
        let all = apply(&table, &FilterSelection::new().with_value("genero", "M"));
        assert_eq!(all.indices(), &[1, 2]);
    }

    #[test]
    fn out_of_domain_and_unknown_fields_are_no_ops() {
        let table = sample();
        let selection = FilterSelection::new()
            .with_value("genero", "X")
            .with_value("estrato", "5")
            .with_value("jornada", "NOCTURNA")
            .with_value("edad", "99-100");
        assert_eq!(apply(&table, &selection).len(), table.len());
    }

    #[test]
    fn selections_compose_as_conjunction() {
        let table = sample();
        let selection = FilterSelection::new()
            .with_value("genero", "M")
            .with_value("estrato", "2");
        assert_eq!(apply(&table, &selection).indices(), &[2]);
    }
}

//! Property tests for combination, domains, filtering and aggregation.

use desercion_core::{aggregate, apply, combine, domain_for};
use desercion_ingest::SourceCatalog;
use desercion_model::fields::{DATASET_ORIGEN, ESTRATO};
use desercion_model::{
    AggregationSpec, FieldValue, FilterSelection, FilterValue, FrequencySpec, Record,
    RecordSource, SourceName, WorkingTable,
};
use proptest::prelude::*;

const SOURCES: [(&str, &str); 3] = [
    ("academica", "Académica"),
    ("no_academica", "No Académica UPTC"),
    ("sena", "SENA"),
];

fn stratum_cell() -> impl Strategy<Value = FieldValue> {
    prop_oneof![
        (1_i64..=6).prop_map(|s| FieldValue::text(s.to_string())),
        (1_i64..=6).prop_map(|s| FieldValue::text(format!("{s}.0"))),
        Just(FieldValue::text("SIN INFORMACION")),
        Just(FieldValue::Missing),
    ]
}

fn record() -> impl Strategy<Value = Record> {
    (
        prop_oneof![Just("F"), Just("M")],
        stratum_cell(),
        prop::option::of(14_i64..70),
    )
        .prop_map(|(genero, estrato, edad)| {
            Record::from_pairs([
                ("genero", FieldValue::from(genero)),
                ("estrato", estrato),
                ("edad", FieldValue::from(edad)),
            ])
            .expect("valid record")
        })
}

fn catalog() -> impl Strategy<Value = SourceCatalog> {
    prop::collection::vec(prop::collection::vec(record(), 0..20), 3).prop_map(|tables| {
        let sources = SOURCES
            .iter()
            .zip(tables)
            .map(|((name, label), records)| {
                RecordSource::from_records(SourceName::new(*name).expect("name"), *label, records)
            })
            .collect();
        SourceCatalog::from_sources(sources).expect("catalog")
    })
}

fn table() -> impl Strategy<Value = WorkingTable> {
    catalog().prop_map(|catalog| {
        combine(&catalog, SOURCES.iter().map(|(name, _)| *name)).expect("non-empty selection")
    })
}

proptest! {
    #[test]
    fn combined_rows_sum_selected_sources(
        catalog in catalog(),
        mask in prop::collection::vec(any::<bool>(), 3),
    ) {
        let selected: Vec<&str> = SOURCES
            .iter()
            .zip(&mask)
            .filter(|(_, keep)| **keep)
            .map(|((name, _), _)| *name)
            .collect();
        prop_assume!(!selected.is_empty());

        let table = combine(&catalog, &selected).expect("selection");
        let expected: usize = selected
            .iter()
            .filter_map(|name| catalog.get(name))
            .map(RecordSource::record_count)
            .sum();
        prop_assert_eq!(table.len(), expected);

        let labels: Vec<&str> = SOURCES
            .iter()
            .filter(|(name, _)| selected.contains(name))
            .map(|(_, label)| *label)
            .collect();
        for row in table.rows() {
            let origin = row.value(DATASET_ORIGEN).key().unwrap_or_default();
            prop_assert!(labels.contains(&origin.as_str()));
        }
    }

    #[test]
    fn domains_start_with_all_and_have_no_duplicates(table in table()) {
        for field in ["genero", "estrato", "edad", "jornada", DATASET_ORIGEN] {
            let options = domain_for(field, &table);
            prop_assert_eq!(&options[0].value, &FilterValue::All);
            let mut values: Vec<&str> = options[1..].iter().map(|o| o.value.as_str()).collect();
            let before = values.len();
            values.sort_unstable();
            values.dedup();
            prop_assert_eq!(values.len(), before);
        }
    }

    #[test]
    fn all_selection_is_identity(table in table()) {
        let selection = FilterSelection::new()
            .with("genero", FilterValue::All)
            .with("estrato", FilterValue::All)
            .with("edad", FilterValue::All);
        let view = apply(&table, &selection);
        let expected: Vec<usize> = (0..table.len()).collect();
        prop_assert_eq!(view.indices(), expected.as_slice());
    }

    #[test]
    fn stratum_filter_only_returns_coerced_matches(table in table(), stratum in 1_i64..=6) {
        let selection = FilterSelection::new().with_value(ESTRATO, stratum.to_string());
        let view = apply(&table, &selection);
        let in_domain = domain_for(ESTRATO, &table)
            .iter()
            .any(|o| o.value.as_str() == stratum.to_string());
        if in_domain {
            for row in view.records() {
                prop_assert_eq!(row.value(ESTRATO).as_stratum(), Some(stratum));
            }
        } else {
            prop_assert_eq!(view.len(), table.len());
        }
    }

    #[test]
    fn top_k_is_bounded_sorted_and_idempotent(table in table(), k in 1_usize..5) {
        let spec = AggregationSpec::Frequency(FrequencySpec::all("estrato").with_top_k(k));
        let first = aggregate(&table.view(), &spec);
        let second = aggregate(&table.view(), &spec);
        prop_assert!(first.len() <= k);
        prop_assert_eq!(&first, &second);
        if let desercion_model::AggregationResult::Frequency(freq) = first {
            prop_assert!(freq.entries.windows(2).all(|w| w[0].count >= w[1].count));
        }
    }
}

#[test]
fn empty_view_yields_empty_results_for_every_kind() {
    let table = WorkingTable::default();
    let view = table.view();
    let specs = [
        AggregationSpec::Frequency(FrequencySpec::top("genero")),
        AggregationSpec::StratumDistribution,
        AggregationSpec::CrossTab {
            rows: "genero".into(),
            columns: "modalidad".into(),
            top_rows: Some(5),
        },
        AggregationSpec::NumericSummary {
            field: "edad".into(),
        },
        AggregationSpec::GroupedSummary {
            group: "modalidad".into(),
            value: "edad".into(),
        },
        AggregationSpec::Histogram {
            field: "edad".into(),
            bins: 30,
        },
        AggregationSpec::Completeness,
    ];
    for spec in &specs {
        assert_eq!(aggregate(&view, spec).len(), 0, "{spec:?}");
    }
}

#[test]
fn top_ten_of_fifteen_distinct_values() {
    let records: Vec<Record> = (0..15_i64)
        .flat_map(|value| {
            // value v appears v + 1 times
            (0..=value).map(move |_| {
                Record::from_pairs([("nombre_facultad", format!("FACULTAD {value:02}"))])
                    .expect("record")
            })
        })
        .collect();
    let catalog = SourceCatalog::from_sources(vec![RecordSource::from_records(
        SourceName::new("academica").expect("name"),
        "Académica",
        records,
    )])
    .expect("catalog");
    let table = combine(&catalog, ["academica"]).expect("table");

    let spec = AggregationSpec::Frequency(FrequencySpec::top("nombre_facultad"));
    let result = aggregate(&table.view(), &spec);
    assert_eq!(result.len(), 10);
    assert_eq!(result, aggregate(&table.view(), &spec));

    let desercion_model::AggregationResult::Frequency(freq) = result else {
        panic!("expected frequency table");
    };
    assert_eq!(freq.entries[0].key, "FACULTAD 14");
    assert_eq!(freq.entries[0].count, 15);
    assert_eq!(freq.entries[9].key, "FACULTAD 05");
}

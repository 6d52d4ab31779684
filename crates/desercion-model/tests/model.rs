//! Tests for desercion-model types.

use desercion_model::{
    AggregationResult, AggregationSpec, CompletenessReport, CrossTab, FilterSelection,
    FilterValue, FrequencyEntry, FrequencySpec, FrequencyTable, RiskTier,
};

#[test]
fn empty_results_report_zero_entries() {
    let results = vec![
        AggregationResult::Frequency(FrequencyTable::empty("genero")),
        AggregationResult::CrossTab(CrossTab::empty("modalidad", "jornada")),
        AggregationResult::NumericSummary {
            field: "edad".to_string(),
            summary: None,
        },
        AggregationResult::GroupedSummary {
            group: "modalidad".to_string(),
            value: "edad".to_string(),
            groups: vec![],
        },
        AggregationResult::Histogram {
            field: "edad".to_string(),
            bins: vec![],
        },
        AggregationResult::Completeness(CompletenessReport::empty()),
    ];
    for result in results {
        assert_eq!(result.len(), 0);
        assert!(result.is_empty());
    }
}

#[test]
fn crosstab_lookup_defaults_to_zero() {
    let table = CrossTab {
        row_field: "modalidad".to_string(),
        column_field: "jornada".to_string(),
        row_keys: vec!["PRESENCIAL".to_string(), "VIRTUAL".to_string()],
        column_keys: vec!["DIURNA".to_string()],
        cells: vec![vec![4], vec![1]],
    };
    assert_eq!(table.get("VIRTUAL", "DIURNA"), 1);
    assert_eq!(table.get("VIRTUAL", "NOCTURNA"), 0);
    assert_eq!(table.get("DISTANCIA", "DIURNA"), 0);
}

#[test]
fn frequency_table_total_sums_counts() {
    let table = FrequencyTable {
        field: "genero".to_string(),
        entries: vec![
            FrequencyEntry {
                key: "F".to_string(),
                label: "F".to_string(),
                count: 3,
            },
            FrequencyEntry {
                key: "M".to_string(),
                label: "M".to_string(),
                count: 2,
            },
        ],
    };
    assert_eq!(table.total(), 5);
}

#[test]
fn top_spec_defaults_to_ten() {
    let spec = FrequencySpec::top("nombre_facultad").with_label_width(40);
    assert_eq!(spec.top_k, Some(10));
    assert_eq!(spec.label_width, Some(40));
}

#[test]
fn aggregation_spec_round_trips_through_json() {
    let spec = AggregationSpec::CrossTab {
        rows: "nombre_facultad".to_string(),
        columns: "genero".to_string(),
        top_rows: Some(5),
    };
    let json = serde_json::to_string(&spec).expect("serialize spec");
    assert!(json.contains(r#""kind":"cross_tab""#));
    let round: AggregationSpec = serde_json::from_str(&json).expect("deserialize spec");
    assert_eq!(round, spec);
}

#[test]
fn selection_serializes_all_sentinel() {
    let selection = FilterSelection::new().with("genero", FilterValue::All);
    let json = serde_json::to_string(&selection).expect("serialize selection");
    assert_eq!(json, r#"{"entries":[["genero","all"]]}"#);
}

#[test]
fn risk_tier_serializes_uppercase() {
    let json = serde_json::to_string(&RiskTier::Medium).expect("serialize tier");
    assert_eq!(json, r#""MEDIUM""#);
}

//! Integration tests for the table renderers.

use desercion_cli::render::{
    assessment_table, domain_table, recommendation_lines, result_table, selection_line,
    sources_table,
};
use desercion_core::{Engine, SelectionInfo, SourceInfo, assess, domain_for};
use desercion_ingest::{DisplayConfig, SourceCatalog};
use desercion_model::{
    AggregationSpec, FrequencySpec, Genero, Jornada, Modalidad, Record, RecordSource, RiskProfile,
    SourceName,
};

fn plain(mut table: comfy_table::Table) -> String {
    table
        .force_no_tty()
        .set_content_arrangement(comfy_table::ContentArrangement::Disabled);
    table.to_string()
}

fn engine() -> Engine {
    let records = [
        ("F", "FACULTAD DE CIENCIAS DE LA EDUCACION Y HUMANIDADES DE TUNJA BOYACA"),
        ("M", "FACULTAD DE INGENIERIA"),
        ("M", "FACULTAD DE INGENIERIA"),
    ]
    .into_iter()
    .map(|(genero, facultad)| {
        Record::from_pairs([("genero", genero), ("nombre_facultad", facultad)]).expect("record")
    })
    .collect();
    let catalog = SourceCatalog::from_sources(vec![RecordSource::from_records(
        SourceName::new("academica").expect("name"),
        "Académica",
        records,
    )])
    .expect("catalog");
    Engine::new(catalog, DisplayConfig::default())
}

#[test]
fn selection_line_formats_counts() {
    let info = SelectionInfo {
        labels: vec!["Académica".into(), "No Académica UPTC".into(), "SENA".into()],
        total_rows: 3372,
    };
    insta::assert_snapshot!(
        selection_line(&info),
        @"Datasets: Académica + No Académica UPTC + SENA (3,372 registros)"
    );
}

#[test]
fn sources_table_lists_rows() {
    let sources = vec![SourceInfo {
        name: "sena".into(),
        label: "SENA".into(),
        rows: 12_045,
    }];
    let rendered = plain(sources_table(&sources));
    assert!(rendered.contains("sena"));
    assert!(rendered.contains("12,045"));
}

#[test]
fn faculty_labels_are_truncated_in_domain_tables() {
    let engine = engine();
    let table = engine.combine(["academica"]).expect("table");
    let options = domain_for("nombre_facultad", &table);
    let rendered = plain(domain_table("nombre_facultad", &options));
    assert!(rendered.contains("Todos"));
    assert!(rendered.contains("FACULTAD DE CIENCIAS DE LA EDUCACION Y HUMANIDADES..."));
}

#[test]
fn frequency_table_shows_shares() {
    let engine = engine();
    let table = engine.combine(["academica"]).expect("table");
    let result = engine.aggregate(
        &table.view(),
        &AggregationSpec::Frequency(FrequencySpec::top("genero")),
    );
    let rendered = plain(result_table(&result));
    assert!(rendered.contains("66.67"));
    assert!(rendered.contains("33.33"));
}

#[test]
fn assessment_renders_tier_and_recommendations() {
    let profile = RiskProfile::new(
        17,
        Genero::Femenino,
        3,
        Modalidad::Distancia,
        Jornada::Diurna,
    )
    .expect("profile");
    let assessment = assess(&profile);

    let rendered = plain(assessment_table(&assessment));
    assert!(rendered.contains("MEDIUM"));
    assert!(rendered.contains("Probabilidad 45%"));

    insta::assert_snapshot!(
        recommendation_lines(&assessment).join("\n"),
        @"- Inscribir en programa de tutorías"
    );
}

#[test]
fn assessment_serializes_for_json_output() {
    let profile = RiskProfile::new(
        20,
        Genero::Femenino,
        4,
        Modalidad::Presencial,
        Jornada::Diurna,
    )
    .expect("profile");
    let assessment = assess(&profile);
    insta::assert_json_snapshot!(
        serde_json::json!({
            "score": assessment.score,
            "tier": assessment.tier,
            "recommendations": assessment.recommendations,
        }),
        @r#"
    {
      "recommendations": [],
      "score": 0,
      "tier": "LOW"
    }
    "#
    );
}

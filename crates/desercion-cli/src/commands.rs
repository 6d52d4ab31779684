use std::time::Instant;

use anyhow::{Context, Result};
use comfy_table::Table;
use serde::Serialize;
use tracing::{debug, info, info_span};

use desercion_cli::logging::redact_value;
use desercion_cli::render::{
    assessment_table, domain_table, kpi_table, recommendation_lines, result_table, selection_line,
    sources_table,
};
use desercion_cli::selection::{parse_filters, resolve_datasets};
use desercion_core::{Engine, SelectionInfo};
use desercion_ingest::{EngineConfig, discover_sources, load_config, resolve_data_root};
use desercion_model::fields::{
    DATASET_ORIGEN, GENERO, JORNADA, MODALIDAD, NOMBRE_FACULTAD, PERIODO_ANO,
};
use desercion_model::{
    AggregationResult, AggregationSpec, FrequencySpec, KpiSummary, RiskProfile, WorkingTable,
};

use crate::cli::{Cli, Command, DataCommand, OutputFormatArg, PredictArgs, SelectionArgs};

/// Faculty label width in the overview tables.
const OVERVIEW_FACULTY_WIDTH: usize = 40;

/// Load configuration and sources into an engine.
///
/// Source failures do not abort: the engine comes up in its no-data state
/// and data commands report it.
pub fn build_engine(cli: &Cli) -> Result<Engine> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)
            .with_context(|| format!("load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let root = resolve_data_root(cli.data_dir.as_deref());
    if cli.discover {
        config.sources = discover_sources(&root)
            .with_context(|| format!("discover sources in {}", root.display()))?;
    }
    debug!(root = %root.display(), sources = config.sources.len(), "resolved data root");
    Ok(Engine::from_config(&config, &root))
}

pub fn run(cli: &Cli) -> Result<()> {
    let name = command_name(&cli.command);
    let span = info_span!("command", name);
    let _guard = span.enter();
    let start = Instant::now();

    let format = cli.format;
    let result = match &cli.command {
        Command::Predict(args) => run_predict(args, format),
        Command::Data(command) => {
            build_engine(cli).and_then(|engine| run_data_command(&engine, command, format))
        }
    };

    info!(duration_ms = start.elapsed().as_millis(), "command finished");
    result
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Data(DataCommand::Sources) => "sources",
        Command::Data(DataCommand::Summary(_)) => "summary",
        Command::Data(DataCommand::Domain { .. }) => "domain",
        Command::Data(DataCommand::Count { .. }) => "count",
        Command::Data(DataCommand::Strata(_)) => "strata",
        Command::Data(DataCommand::Crosstab { .. }) => "crosstab",
        Command::Data(DataCommand::Describe { .. }) => "describe",
        Command::Data(DataCommand::Grouped { .. }) => "grouped",
        Command::Data(DataCommand::Histogram { .. }) => "histogram",
        Command::Data(DataCommand::Completeness(_)) => "completeness",
        Command::Predict(_) => "predict",
    }
}

fn run_data_command(engine: &Engine, command: &DataCommand, format: OutputFormatArg) -> Result<()> {
    match command {
        DataCommand::Sources => {
            let sources = engine.list_sources()?;
            emit(format, &sources, || sources_table(&sources))
        }
        DataCommand::Summary(selection) => run_summary(engine, selection, format),
        DataCommand::Domain { field, selection } => {
            let (_, table) = working_table(engine, selection)?;
            let options = engine.domain(field, &table);
            emit(format, &options, || domain_table(field, &options))
        }
        DataCommand::Count {
            field,
            top,
            by_key,
            selection,
        } => {
            let mut spec = if *by_key {
                FrequencySpec::by_key(field)
            } else {
                FrequencySpec::all(field)
            };
            spec.top_k = *top;
            run_aggregation(engine, selection, &AggregationSpec::Frequency(spec), format)
        }
        DataCommand::Strata(selection) => {
            run_aggregation(engine, selection, &AggregationSpec::StratumDistribution, format)
        }
        DataCommand::Crosstab {
            rows,
            columns,
            top_rows,
            selection,
        } => {
            let spec = AggregationSpec::CrossTab {
                rows: rows.clone(),
                columns: columns.clone(),
                top_rows: *top_rows,
            };
            run_aggregation(engine, selection, &spec, format)
        }
        DataCommand::Describe { field, selection } => {
            let spec = AggregationSpec::NumericSummary {
                field: field.clone(),
            };
            run_aggregation(engine, selection, &spec, format)
        }
        DataCommand::Grouped {
            group,
            value,
            selection,
        } => {
            let spec = AggregationSpec::GroupedSummary {
                group: group.clone(),
                value: value.clone(),
            };
            run_aggregation(engine, selection, &spec, format)
        }
        DataCommand::Histogram {
            field,
            bins,
            selection,
        } => {
            let spec = AggregationSpec::Histogram {
                field: field.clone(),
                bins: bins.unwrap_or(engine.display().histogram_bins),
            };
            run_aggregation(engine, selection, &spec, format)
        }
        DataCommand::Completeness(selection) => {
            run_aggregation(engine, selection, &AggregationSpec::Completeness, format)
        }
    }
}

/// Combine the requested datasets; no datasets means all of them.
fn working_table(engine: &Engine, args: &SelectionArgs) -> Result<(SelectionInfo, WorkingTable)> {
    let available: Vec<String> = engine
        .list_sources()?
        .into_iter()
        .map(|source| source.name)
        .collect();
    let names = resolve_datasets(&args.datasets, &available);
    let info = engine.describe_selection(&names)?;
    let table = engine.combine(&names)?;
    Ok((info, table))
}

fn run_aggregation(
    engine: &Engine,
    args: &SelectionArgs,
    spec: &AggregationSpec,
    format: OutputFormatArg,
) -> Result<()> {
    let (info, table) = working_table(engine, args)?;
    let selection = parse_filters(&args.filters)?;
    for (field, value) in selection.iter() {
        debug!(field, value = redact_value(value.as_str()), "filter");
    }
    let view = engine.apply(&table, &selection);
    let result = engine.aggregate(&view, spec);
    if format == OutputFormatArg::Table {
        println!("{}", selection_line(&info));
        if view.len() != table.len() {
            println!("Filtrados: {} registros", view.len());
        }
    }
    emit(format, &result, || result_table(&result))
}

#[derive(Serialize)]
struct Overview {
    selection: SelectionInfo,
    filtered_rows: usize,
    kpis: KpiSummary,
    sections: Vec<AggregationResult>,
}

fn run_summary(engine: &Engine, args: &SelectionArgs, format: OutputFormatArg) -> Result<()> {
    let (info, table) = working_table(engine, args)?;
    let selection = parse_filters(&args.filters)?;
    let view = engine.apply(&table, &selection);
    let top_k = engine.display().top_k;

    let specs = [
        AggregationSpec::Frequency(FrequencySpec::all(DATASET_ORIGEN)),
        AggregationSpec::Frequency(FrequencySpec::all(GENERO)),
        AggregationSpec::StratumDistribution,
        AggregationSpec::Frequency(FrequencySpec::all(MODALIDAD)),
        AggregationSpec::Frequency(FrequencySpec::all(JORNADA)),
        AggregationSpec::Frequency(
            FrequencySpec::all(NOMBRE_FACULTAD)
                .with_top_k(top_k)
                .with_label_width(OVERVIEW_FACULTY_WIDTH),
        ),
        AggregationSpec::Frequency(FrequencySpec::by_key(PERIODO_ANO)),
    ];
    let overview = Overview {
        filtered_rows: view.len(),
        kpis: engine.kpis(&view),
        sections: specs
            .iter()
            .map(|spec| engine.aggregate(&view, spec))
            .filter(|result| !result.is_empty())
            .collect(),
        selection: info,
    };

    match format {
        OutputFormatArg::Json => print_json(&overview),
        OutputFormatArg::Table => {
            println!("{}", selection_line(&overview.selection));
            println!("{}", kpi_table(&overview.kpis));
            for section in &overview.sections {
                println!("{}", result_table(section));
            }
            Ok(())
        }
    }
}

fn run_predict(args: &PredictArgs, format: OutputFormatArg) -> Result<()> {
    let profile = RiskProfile::new(
        args.edad,
        args.genero.parse()?,
        args.estrato,
        args.modalidad.parse()?,
        args.jornada.parse()?,
    )?;
    debug!(
        modalidad = redact_value(profile.modalidad.code()),
        jornada = redact_value(profile.jornada.code()),
        "scoring profile"
    );
    let assessment = desercion_core::assess(&profile);
    info!(tier = %assessment.tier, "risk assessed");

    match format {
        OutputFormatArg::Json => print_json(&assessment),
        OutputFormatArg::Table => {
            println!("{}", assessment_table(&assessment));
            let lines = recommendation_lines(&assessment);
            if !lines.is_empty() {
                println!("Recomendaciones:");
                for line in lines {
                    println!("{line}");
                }
            }
            Ok(())
        }
    }
}

fn emit<T, F>(format: OutputFormatArg, value: &T, table: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce() -> Table,
{
    match format {
        OutputFormatArg::Json => print_json(value),
        OutputFormatArg::Table => {
            println!("{}", table());
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serialize output")?;
    println!("{json}");
    Ok(())
}

//! CLI argument definitions for the attrition dashboard.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "desercion",
    version,
    about = "Student attrition analytics - combine, filter and aggregate attrition records",
    long_about = "Explore student attrition records from academic, non-academic and SENA sources.\n\n\
                  Combine datasets, filter by demographic fields, aggregate counts and\n\
                  statistics, and estimate dropout risk for a student profile."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Engine configuration file (TOML). Defaults to the three cleaned exports.
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Directory that relative source paths resolve against
    /// (default: $DESERCION_DATA_DIR, then ./data).
    #[arg(long = "data-dir", value_name = "DIR", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Load every CSV in the data directory as an optional source instead
    /// of the configured sources.
    #[arg(long = "discover", global = true)]
    pub discover: bool,

    /// Output format for results.
    #[arg(long = "format", value_enum, default_value = "table", global = true)]
    pub format: OutputFormatArg,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Allow filter values and profile fields to appear in logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    #[command(flatten)]
    Data(DataCommand),

    /// Estimate dropout risk for a student profile.
    Predict(PredictArgs),
}

/// Commands that read the loaded sources.
#[derive(Subcommand)]
pub enum DataCommand {
    /// List the loaded datasets with their record counts.
    Sources,

    /// Overview: selection, KPIs and the headline distributions.
    Summary(SelectionArgs),

    /// Filter options for a field, computed from the unfiltered selection.
    Domain {
        /// Field name, e.g. estrato or nombre_facultad.
        field: String,
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Frequency count of a field.
    Count {
        field: String,
        /// Keep only the K most frequent values.
        #[arg(long = "top", value_name = "K")]
        top: Option<usize>,
        /// Sort by value instead of count (time series).
        #[arg(long = "by-key")]
        by_key: bool,
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Record counts per socioeconomic stratum.
    Strata(SelectionArgs),

    /// Cross-tabulation of two fields.
    Crosstab {
        rows: String,
        columns: String,
        /// Keep only the K most frequent row values.
        #[arg(long = "top-rows", value_name = "K")]
        top_rows: Option<usize>,
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Descriptive statistics of a numeric field.
    Describe {
        field: String,
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Descriptive statistics of a numeric field per group.
    Grouped {
        group: String,
        value: String,
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Equal-width histogram of a numeric field.
    Histogram {
        field: String,
        /// Number of bins (default from configuration).
        #[arg(long = "bins")]
        bins: Option<usize>,
        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Share of non-missing values per field.
    Completeness(SelectionArgs),
}

#[derive(Args, Clone, Default)]
pub struct SelectionArgs {
    /// Datasets to combine (repeat or comma-separate; default all).
    #[arg(long = "dataset", short = 'd', value_name = "NAME")]
    pub datasets: Vec<String>,

    /// Filter as field=value (repeatable; value `all` clears it).
    #[arg(long = "filter", short = 'f', value_name = "FIELD=VALUE")]
    pub filters: Vec<String>,
}

#[derive(Args)]
pub struct PredictArgs {
    #[arg(long = "edad")]
    pub edad: u32,
    /// M or F.
    #[arg(long = "genero")]
    pub genero: String,
    /// 1 to 6.
    #[arg(long = "estrato")]
    pub estrato: u8,
    /// PRESENCIAL, VIRTUAL or DISTANCIA.
    #[arg(long = "modalidad")]
    pub modalidad: String,
    /// DIURNA, NOCTURNA or EXTENDIDA.
    #[arg(long = "jornada")]
    pub jornada: String,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    Table,
    Json,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

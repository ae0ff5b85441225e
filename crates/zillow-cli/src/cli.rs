//! CLI argument definitions for the `zillow` binary.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use zillow_model::Profile;

#[derive(Parser)]
#[command(
    name = "zillow",
    version,
    about = "Acquire, clean and split the Zillow 2017 property table",
    long_about = "Acquire the Zillow 2017 property table, clean it and split it for modeling.\n\n\
                  The first load queries the store and writes a CSV cache; later loads\n\
                  read the cache. Partitions are min-max scaled against the training set."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

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
}

#[derive(Subcommand)]
pub enum Command {
    /// Load the raw table (cache or query) and print its shape.
    Acquire(SourceArgs),

    /// Report missing values per column and per row of the raw table.
    Audit(AuditArgs),

    /// Run the full pipeline and write scaled partitions.
    Prepare(PrepareArgs),
}

#[derive(Args)]
pub struct SourceArgs {
    /// SQLite copy of the Zillow store.
    #[arg(long = "db", value_name = "SQLITE")]
    pub db: PathBuf,

    /// CSV cache location (default: zillow_db.csv, or the config's cache_path).
    #[arg(long = "cache", value_name = "PATH")]
    pub cache: Option<PathBuf>,
}

#[derive(Args)]
pub struct AuditArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Also write the report as JSON.
    #[arg(long = "json", value_name = "PATH")]
    pub json: Option<PathBuf>,
}

#[derive(Args)]
pub struct PrepareArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// TOML pipeline configuration.
    #[arg(long = "config", value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Wrangle profile (overrides the config).
    #[arg(long = "profile", value_enum)]
    pub profile: Option<ProfileArg>,

    /// Directory for X_/y_ partition files and scaler.json.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "prepared")]
    pub output_dir: PathBuf,

    /// Split seed (overrides the config).
    #[arg(long = "seed")]
    pub seed: Option<u64>,

    /// Column whose values each hold-out represents proportionally.
    #[arg(long = "stratify-by", value_name = "COLUMN")]
    pub stratify_by: Option<String>,

    /// Run every stage without writing partition files.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum ProfileArg {
    Minimal,
    Extended,
}

impl From<ProfileArg> for Profile {
    fn from(value: ProfileArg) -> Self {
        match value {
            ProfileArg::Minimal => Profile::Minimal,
            ProfileArg::Extended => Profile::Extended,
        }
    }
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

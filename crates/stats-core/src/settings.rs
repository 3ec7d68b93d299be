use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::models::TimestampPolicy;

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Extract, clean and summarize game reviews from a spreadsheet export
#[derive(Parser, Debug, Clone)]
#[command(
    name = "review-stats",
    about = "Extract, clean and summarize game reviews from a spreadsheet export",
    version
)]
pub struct Settings {
    /// Logging level (RUST_LOG takes precedence when set)
    #[arg(
        long,
        global = true,
        default_value = "info",
        env = "REVIEW_STATS_LOG_LEVEL",
        value_parser = ["trace", "debug", "info", "warn", "error"]
    )]
    pub log_level: String,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

/// How log lines are rendered on stderr.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// One pipeline stage, or the whole pipeline.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Convert the spreadsheet into the row-oriented intermediate file
    Load(LoadArgs),
    /// Validate, filter and project the intermediate into review records
    Clean(CleanArgs),
    /// Summarize cleaned records and print the statistics as JSON
    Aggregate(AggregateArgs),
    /// Write cleaned records and statistics to the output locations
    Export(ExportArgs),
    /// Run load, clean, aggregate and export in sequence
    Run(RunArgs),
}

// ── Shared argument groups ─────────────────────────────────────────────────────

#[derive(Args, Debug, Clone)]
pub struct SourceArg {
    /// Spreadsheet to read (.xlsx, .xls, .xlsb, .ods or .csv)
    #[arg(long, env = "REVIEW_STATS_SOURCE", default_value = "reviews.xlsx")]
    pub source: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct IntermediateArg {
    /// Intermediate file threaded between stages
    #[arg(
        long,
        env = "REVIEW_STATS_INTERMEDIATE",
        default_value = "intermediate.csv"
    )]
    pub intermediate: PathBuf,
}

#[derive(Args, Debug, Clone)]
pub struct PolicyArg {
    /// What to do with an unparseable `created` value
    #[arg(long, value_enum, default_value_t = TimestampPolicy::Fail)]
    pub on_bad_timestamp: TimestampPolicy,
}

#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Destination for the cleaned review records
    #[arg(
        long,
        env = "REVIEW_STATS_RECORDS_OUT",
        default_value = "cleaned_reviews.json"
    )]
    pub records_out: PathBuf,

    /// Destination for the summary statistics
    #[arg(
        long,
        env = "REVIEW_STATS_SUMMARY_OUT",
        default_value = "calculations.json"
    )]
    pub summary_out: PathBuf,
}

// ── Per-command arguments ──────────────────────────────────────────────────────

#[derive(Args, Debug, Clone)]
pub struct LoadArgs {
    #[command(flatten)]
    pub source: SourceArg,
    #[command(flatten)]
    pub intermediate: IntermediateArg,
}

#[derive(Args, Debug, Clone)]
pub struct CleanArgs {
    #[command(flatten)]
    pub intermediate: IntermediateArg,
    #[command(flatten)]
    pub policy: PolicyArg,
}

#[derive(Args, Debug, Clone)]
pub struct AggregateArgs {
    #[command(flatten)]
    pub intermediate: IntermediateArg,
}

#[derive(Args, Debug, Clone)]
pub struct ExportArgs {
    #[command(flatten)]
    pub intermediate: IntermediateArg,
    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[command(flatten)]
    pub source: SourceArg,
    #[command(flatten)]
    pub intermediate: IntermediateArg,
    #[command(flatten)]
    pub output: OutputArgs,
    #[command(flatten)]
    pub policy: PolicyArg,
}

// ── Tests ──────────────────────────────────────────────────────────────────────

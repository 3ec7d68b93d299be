mod bootstrap;

use std::io::Write;

use anyhow::Result;
use clap::Parser;
use stats_core::formatting::summary_line;
use stats_core::settings::{Command, Settings};
use stats_data::aggregator::ReviewAggregator;
use stats_data::cleaner::clean_intermediate;
use stats_data::exporter::{read_records, to_json_indented, write_records, write_summary};
use stats_data::loader::load_spreadsheet;
use stats_data::pipeline::{run_pipeline, PipelinePaths};

fn main() -> Result<()> {
    let settings = Settings::parse();

    bootstrap::setup_logging(&settings.log_level, settings.log_format)?;

    tracing::info!("review-stats v{} starting", env!("CARGO_PKG_VERSION"));

    match settings.command {
        Command::Load(args) => {
            let path = load_spreadsheet(&args.source.source, &args.intermediate.intermediate)?;
            println!("{}", path.display());
        }

        Command::Clean(args) => {
            let path = clean_intermediate(
                &args.intermediate.intermediate,
                args.policy.on_bad_timestamp,
            )?;
            println!("{}", path.display());
        }

        Command::Aggregate(args) => {
            let summary = ReviewAggregator::summarize_file(&args.intermediate.intermediate)?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&to_json_indented(&summary)?)?;
            writeln!(stdout)?;
        }

        Command::Export(args) => {
            let records = read_records(&args.intermediate.intermediate)?;
            // Summarize before writing anything so an empty dataset exports nothing.
            let summary = ReviewAggregator::summarize(&records)?;
            write_records(&args.output.records_out, &records)?;
            write_summary(&args.output.summary_out, &summary)?;
        }

        Command::Run(args) => {
            let paths = PipelinePaths {
                source: args.source.source,
                intermediate: args.intermediate.intermediate,
                records_out: args.output.records_out,
                summary_out: args.output.summary_out,
            };
            let report = run_pipeline(&paths, args.policy.on_bad_timestamp)?;
            tracing::info!("{}", summary_line(&report.summary));
        }
    }

    Ok(())
}

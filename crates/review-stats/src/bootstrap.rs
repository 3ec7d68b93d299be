use stats_core::settings::LogFormat;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Initialise the global `tracing` subscriber.
///
/// `RUST_LOG` wins when set; otherwise `log_level` becomes the filter
/// directive. All output goes to stderr so stdout stays free for the JSON the
/// `aggregate` command prints.
pub fn setup_logging(log_level: &str, format: LogFormat) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| filter_for(log_level));

    let layer = match format {
        LogFormat::Pretty => fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()?;

    Ok(())
}

/// Build a filter from a level name, falling back to `info` when it does not
/// parse.
fn filter_for(log_level: &str) -> EnvFilter {
    EnvFilter::try_new(log_level.to_lowercase()).unwrap_or_else(|_| EnvFilter::new("info"))
}

// ── Tests ──────────────────────────────────────────────────────────────────────

//! Output artifacts for the display application.
//!
//! Writes the cleaned review records and the summary statistics as JSON
//! documents. Parent directories are never created: an unwritable or missing
//! destination is a [`PipelineError::WriteFailure`].

use std::path::Path;

use serde::Serialize;
use stats_core::error::{PipelineError, Result};
use stats_core::models::{ReviewRecord, SummaryStatistics};
use tracing::info;

/// Write `records` to `path` as a JSON array with one object per record.
pub fn write_records(path: &Path, records: &[ReviewRecord]) -> Result<()> {
    let bytes = serde_json::to_vec(records)?;
    write_atomic(path, &bytes)?;
    info!("Exported {} review records to {}", records.len(), path.display());
    Ok(())
}

/// Write `summary` to `path` as a single JSON document indented by four spaces.
pub fn write_summary(path: &Path, summary: &SummaryStatistics) -> Result<()> {
    let bytes = to_json_indented(summary)?;
    write_atomic(path, &bytes)?;
    info!("Exported summary statistics to {}", path.display());
    Ok(())
}

/// Read a JSON array of review records, as produced by [`write_records`] or by
/// the cleaner.
pub fn read_records(path: &Path) -> Result<Vec<ReviewRecord>> {
    let contents = std::fs::read(path).map_err(|e| PipelineError::source_unavailable(path, e))?;
    Ok(serde_json::from_slice(&contents)?)
}

/// Serialize `value` as pretty JSON with a four-space indent.
pub fn to_json_indented<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}

/// Write `bytes` to a sibling temp file, then rename it over `path`.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);

    std::fs::write(&tmp, bytes).map_err(|e| PipelineError::write_failure(path, e))?;
    std::fs::rename(&tmp, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp);
        PipelineError::write_failure(path, e)
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! End-to-end review pipeline.
//!
//! Chains load, clean, aggregate and export, halting on the first error and
//! returning a [`PipelineReport`] for the caller to log.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use stats_core::error::Result;
use stats_core::models::{SummaryStatistics, TimestampPolicy};
use tracing::info;

use crate::aggregator::ReviewAggregator;
use crate::cleaner::clean_intermediate;
use crate::exporter::{read_records, write_records, write_summary};
use crate::loader::load_table;

// ── Public types ──────────────────────────────────────────────────────────────

/// File locations used by one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelinePaths {
    /// Spreadsheet to read.
    pub source: PathBuf,
    /// Intermediate threaded between stages (CSV, then JSON records).
    pub intermediate: PathBuf,
    /// Destination for the cleaned records.
    pub records_out: PathBuf,
    /// Destination for the summary statistics.
    pub summary_out: PathBuf,
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Data rows found in the spreadsheet.
    pub rows_loaded: usize,
    /// Records that survived cleaning.
    pub records_kept: usize,
    pub summary: SummaryStatistics,
    /// Wall-clock time for the whole run.
    pub elapsed: Duration,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full pipeline.
///
/// 1. Load the spreadsheet into the CSV intermediate.
/// 2. Clean it in place into JSON records.
/// 3. Summarize the records.
/// 4. Export the records, then the summary.
///
/// Both exports happen after the summary is computed, so a schema or empty
/// dataset failure leaves no output artifacts behind.
pub fn run_pipeline(paths: &PipelinePaths, policy: TimestampPolicy) -> Result<PipelineReport> {
    let start = Instant::now();

    // ── Step 1: Load ──────────────────────────────────────────────────────────
    let rows_loaded = load_table(&paths.source, &paths.intermediate)?.rows.len();

    // ── Step 2: Clean ─────────────────────────────────────────────────────────
    let cleaned = clean_intermediate(&paths.intermediate, policy)?;
    let records = read_records(&cleaned)?;

    // ── Step 3: Aggregate ─────────────────────────────────────────────────────
    let summary = ReviewAggregator::summarize(&records)?;

    // ── Step 4: Export ────────────────────────────────────────────────────────
    write_records(&paths.records_out, &records)?;
    write_summary(&paths.summary_out, &summary)?;

    let elapsed = start.elapsed();
    info!(
        "Pipeline finished in {:.3}s: {} rows loaded, {} records kept",
        elapsed.as_secs_f64(),
        rows_loaded,
        records.len()
    );

    Ok(PipelineReport {
        rows_loaded,
        records_kept: records.len(),
        summary,
        elapsed,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;
    use stats_core::error::PipelineError;
    use tempfile::TempDir;

    struct Row<'a> {
        created: &'a str,
        voted_up: Option<bool>,
        review: Option<&'a str>,
        steam_purchase: bool,
        received_for_free: bool,
        minutes: f64,
    }

    fn row(voted_up: bool, purchased: bool, free: bool, minutes: f64) -> Row<'static> {
        Row {
            created: "2021-01-01 12:00:00",
            voted_up: Some(voted_up),
            review: Some("A review"),
            steam_purchase: purchased,
            received_for_free: free,
            minutes,
        }
    }

    /// Write a workbook with the Steam export layout. `with_voted_up = false`
    /// leaves that column out entirely.
    fn write_workbook(path: &std::path::Path, rows: &[Row], with_voted_up: bool) {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();

        let mut headers = vec!["recommendationid", "created"];
        if with_voted_up {
            headers.push("voted_up");
        }
        headers.extend(["review", "steam_purchase", "recieved_for_free", "author_playtime_forever"]);
        for (col, name) in headers.iter().enumerate() {
            sheet.write_string(0, col as u16, *name).unwrap();
        }

        for (i, r) in rows.iter().enumerate() {
            let line = i as u32 + 1;
            let mut col = 0u16;
            sheet.write_number(line, col, (i + 100) as f64).unwrap();
            col += 1;
            sheet.write_string(line, col, r.created).unwrap();
            col += 1;
            if with_voted_up {
                if let Some(v) = r.voted_up {
                    sheet.write_boolean(line, col, v).unwrap();
                }
                col += 1;
            }
            if let Some(text) = r.review {
                sheet.write_string(line, col, text).unwrap();
            }
            col += 1;
            sheet.write_boolean(line, col, r.steam_purchase).unwrap();
            col += 1;
            sheet.write_boolean(line, col, r.received_for_free).unwrap();
            col += 1;
            sheet.write_number(line, col, r.minutes).unwrap();
        }

        workbook.save(path).unwrap();
    }

    fn paths_in(dir: &TempDir) -> PipelinePaths {
        PipelinePaths {
            source: dir.path().join("reviews.xlsx"),
            intermediate: dir.path().join("intermediate.csv"),
            records_out: dir.path().join("cleaned_reviews.json"),
            summary_out: dir.path().join("calculations.json"),
        }
    }

    #[test]
    fn test_pipeline_three_complete_rows() {
        let dir = TempDir::new().unwrap();
        let paths = paths_in(&dir);
        write_workbook(
            &paths.source,
            &[
                row(true, true, false, 60.0),
                row(true, false, false, 120.0),
                row(false, true, true, 180.0),
            ],
            true,
        );

        let report = run_pipeline(&paths, TimestampPolicy::Fail).unwrap();

        assert_eq!(report.rows_loaded, 3);
        assert_eq!(report.records_kept, 3);
        let s = &report.summary;
        assert_eq!(s.user_count, 3);
        assert_eq!(s.like_count, 2);
        assert_eq!(s.dislike_count, 1);
        assert_eq!(s.purchased_count, 2);
        assert_eq!(s.not_purchased_count, 1);
        assert_eq!(s.free_count, 1);
        assert_eq!(s.playtime_hours, vec![1.0, 2.0, 3.0]);
        assert_eq!(s.total_hours, 6.0);
        assert_eq!(s.avg_hours, 2.0);

        let written: SummaryStatistics =
            serde_json::from_str(&std::fs::read_to_string(&paths.summary_out).unwrap()).unwrap();
        assert_eq!(&written, s);

        let exported = read_records(&paths.records_out).unwrap();
        assert_eq!(exported.len(), 3);
        assert_eq!(exported[2].author_playtime_forever, 180);
        assert!(exported[2].received_for_free);
    }

    #[test]
    fn test_pipeline_row_without_review_is_excluded() {
        let dir = TempDir::new().unwrap();
        let paths = paths_in(&dir);
        let mut missing_review = row(true, true, false, 30.0);
        missing_review.review = None;
        write_workbook(
            &paths.source,
            &[row(true, true, false, 60.0), missing_review, row(false, false, false, 120.0)],
            true,
        );

        let report = run_pipeline(&paths, TimestampPolicy::Fail).unwrap();

        assert_eq!(report.rows_loaded, 3);
        assert_eq!(report.summary.user_count, 2);
        assert_eq!(report.summary.playtime_hours, vec![1.0, 2.0]);
    }

    #[test]
    fn test_pipeline_missing_voted_up_column_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let paths = paths_in(&dir);
        write_workbook(&paths.source, &[row(true, true, false, 60.0)], false);

        let err = run_pipeline(&paths, TimestampPolicy::Fail).unwrap_err();

        match err {
            PipelineError::SchemaMismatch { missing } => assert_eq!(missing, vec!["voted_up"]),
            other => panic!("expected SchemaMismatch, got {other:?}"),
        }
        assert!(!paths.records_out.exists());
        assert!(!paths.summary_out.exists());
    }

    #[test]
    fn test_pipeline_no_valid_rows_is_empty_dataset() {
        let dir = TempDir::new().unwrap();
        let paths = paths_in(&dir);
        let mut unvoted = row(true, true, false, 60.0);
        unvoted.voted_up = None;
        write_workbook(&paths.source, &[unvoted], true);

        let err = run_pipeline(&paths, TimestampPolicy::Fail).unwrap_err();

        assert!(matches!(err, PipelineError::EmptyDataset));
        assert!(!paths.summary_out.exists());
        assert!(!paths.records_out.exists());
    }

    #[test]
    fn test_pipeline_missing_source() {
        let dir = TempDir::new().unwrap();
        let paths = paths_in(&dir);

        let err = run_pipeline(&paths, TimestampPolicy::Fail).unwrap_err();
        assert!(matches!(err, PipelineError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_pipeline_bad_timestamp_policies() {
        let dir = TempDir::new().unwrap();
        let paths = paths_in(&dir);
        let mut bad = row(true, true, false, 60.0);
        bad.created = "sometime in 2021";
        write_workbook(&paths.source, &[row(false, true, false, 120.0), bad], true);

        let err = run_pipeline(&paths, TimestampPolicy::Fail).unwrap_err();
        assert!(matches!(err, PipelineError::MalformedTimestamp { row: 2, .. }));
        assert!(!paths.summary_out.exists());

        let report = run_pipeline(&paths, TimestampPolicy::Drop).unwrap();
        assert_eq!(report.summary.user_count, 1);
        assert_eq!(report.summary.dislike_count, 1);
    }

    #[test]
    fn test_pipeline_unwritable_output() {
        let dir = TempDir::new().unwrap();
        let mut paths = paths_in(&dir);
        paths.summary_out = dir.path().join("app").join("calculations.json");
        write_workbook(&paths.source, &[row(true, true, false, 60.0)], true);

        let err = run_pipeline(&paths, TimestampPolicy::Fail).unwrap_err();
        assert!(matches!(err, PipelineError::WriteFailure { .. }));
    }
}

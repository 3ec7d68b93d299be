//! Validation, filtering and projection of the loaded table.
//!
//! Turns the untyped CSV intermediate into [`ReviewRecord`]s and writes them
//! back over the same path as a field-named JSON array.

use std::path::{Path, PathBuf};

use stats_core::data_processors::{FieldParser, TimestampProcessor};
use stats_core::error::{PipelineError, Result};
use stats_core::models::{
    RawTable, ReviewRecord, TimestampPolicy, COL_CREATED, COL_PLAYTIME_FOREVER,
    COL_RECEIVED_FOR_FREE, COL_RECEIVED_FOR_FREE_LEGACY, COL_REVIEW, COL_STEAM_PURCHASE,
    COL_VOTED_UP, REQUIRED_COLUMNS,
};
use tracing::{debug, info, warn};

use crate::exporter::write_atomic;
use crate::loader::read_csv_table;

// ── Public API ────────────────────────────────────────────────────────────────

/// Clean the CSV intermediate at `path` and overwrite it with JSON records.
///
/// Returns `path` so the next stage can pick it up. Nothing is written when
/// cleaning fails.
pub fn clean_intermediate(path: &Path, policy: TimestampPolicy) -> Result<PathBuf> {
    info!("Cleaning intermediate {}", path.display());

    let table = read_csv_table(path)?;
    debug!("Columns in intermediate: {:?}", table.headers);

    let records = clean_table(&table, policy)?;

    let bytes = serde_json::to_vec(&records)?;
    write_atomic(path, &bytes)?;

    Ok(path.to_path_buf())
}

/// Validate and convert `table` into typed review records.
///
/// * Missing columns fail with [`PipelineError::SchemaMismatch`]; the two
///   required columns are listed first.
/// * Rows with an empty `voted_up` or `review` cell are dropped.
/// * An unparseable `created` cell fails the batch or drops the row,
///   depending on `policy`.
/// * Any other unparseable typed cell fails with
///   [`PipelineError::InvalidField`].
///
/// Row numbers in errors are 1-based and count data rows only.
pub fn clean_table(table: &RawTable, policy: TimestampPolicy) -> Result<Vec<ReviewRecord>> {
    let columns = ColumnMap::resolve(table)?;

    let mut records = Vec::with_capacity(table.rows.len());
    let mut dropped_incomplete = 0usize;
    let mut dropped_timestamp = 0usize;

    for (index, row) in table.rows.iter().enumerate() {
        let row_number = index + 1;

        if FieldParser::is_missing(cell(row, columns.voted_up))
            || FieldParser::is_missing(cell(row, columns.review))
        {
            dropped_incomplete += 1;
            continue;
        }

        let raw_created = cell(row, columns.created);
        let created = match TimestampProcessor::parse(raw_created) {
            Some(ts) => ts,
            None => match policy {
                TimestampPolicy::Fail => {
                    return Err(PipelineError::MalformedTimestamp {
                        row: row_number,
                        value: raw_created.to_string(),
                    })
                }
                TimestampPolicy::Drop => {
                    warn!(
                        "Dropping row {}: unparseable timestamp {:?}",
                        row_number, raw_created
                    );
                    dropped_timestamp += 1;
                    continue;
                }
            },
        };

        records.push(ReviewRecord {
            created,
            voted_up: bool_cell(row, columns.voted_up, COL_VOTED_UP, row_number)?,
            review: cell(row, columns.review).to_string(),
            steam_purchase: bool_cell(row, columns.steam_purchase, COL_STEAM_PURCHASE, row_number)?,
            received_for_free: bool_cell(
                row,
                columns.received_for_free,
                COL_RECEIVED_FOR_FREE,
                row_number,
            )?,
            author_playtime_forever: minutes_cell(row, columns.playtime, row_number)?,
        });
    }

    info!(
        "Cleaned {} rows: {} kept, {} incomplete, {} bad timestamps",
        table.rows.len(),
        records.len(),
        dropped_incomplete,
        dropped_timestamp
    );

    Ok(records)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Header positions of the six projected columns.
#[derive(Debug)]
struct ColumnMap {
    created: usize,
    voted_up: usize,
    review: usize,
    steam_purchase: usize,
    received_for_free: usize,
    playtime: usize,
}

impl ColumnMap {
    fn resolve(table: &RawTable) -> Result<Self> {
        let mut missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| table.column_index(name).is_none())
            .map(|name| name.to_string())
            .collect();

        let created = table.column_index(COL_CREATED);
        let steam_purchase = table.column_index(COL_STEAM_PURCHASE);
        let received_for_free =
            table.column_index_any(&[COL_RECEIVED_FOR_FREE, COL_RECEIVED_FOR_FREE_LEGACY]);
        let playtime = table.column_index(COL_PLAYTIME_FOREVER);

        for (name, index) in [
            (COL_CREATED, created),
            (COL_STEAM_PURCHASE, steam_purchase),
            (COL_RECEIVED_FOR_FREE, received_for_free),
            (COL_PLAYTIME_FOREVER, playtime),
        ] {
            if index.is_none() {
                missing.push(name.to_string());
            }
        }

        match (
            created,
            table.column_index(COL_VOTED_UP),
            table.column_index(COL_REVIEW),
            steam_purchase,
            received_for_free,
            playtime,
        ) {
            (
                Some(created),
                Some(voted_up),
                Some(review),
                Some(steam_purchase),
                Some(received_for_free),
                Some(playtime),
            ) => Ok(Self {
                created,
                voted_up,
                review,
                steam_purchase,
                received_for_free,
                playtime,
            }),
            _ => Err(PipelineError::SchemaMismatch { missing }),
        }
    }
}

/// Cell text at `index`, or `""` when the row is shorter than the header.
fn cell(row: &[String], index: usize) -> &str {
    row.get(index).map(String::as_str).unwrap_or("")
}

fn bool_cell(row: &[String], index: usize, column: &str, row_number: usize) -> Result<bool> {
    let raw = cell(row, index);
    FieldParser::parse_bool(raw).ok_or_else(|| PipelineError::InvalidField {
        row: row_number,
        column: column.to_string(),
        value: raw.to_string(),
    })
}

fn minutes_cell(row: &[String], index: usize, row_number: usize) -> Result<u64> {
    let raw = cell(row, index);
    FieldParser::parse_minutes(raw).ok_or_else(|| PipelineError::InvalidField {
        row: row_number,
        column: COL_PLAYTIME_FOREVER.to_string(),
        value: raw.to_string(),
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Spreadsheet acquisition.
//!
//! Reads the first worksheet of a workbook (or a plain CSV export) into a
//! [`RawTable`] and writes it unchanged as the row-oriented CSV intermediate.

use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Reader};
use stats_core::error::{PipelineError, Result};
use stats_core::models::RawTable;
use tracing::{debug, info};

use crate::exporter::write_atomic;

// ── Public API ────────────────────────────────────────────────────────────────

/// Convert the spreadsheet at `source` into a CSV file at `intermediate`.
///
/// Every row and column of the first worksheet is copied as-is, including
/// incomplete rows. Any prior file at `intermediate` is replaced.
pub fn load_spreadsheet(source: &Path, intermediate: &Path) -> Result<PathBuf> {
    load_table(source, intermediate)?;
    Ok(intermediate.to_path_buf())
}

/// Same as [`load_spreadsheet`], but hands back the table that was written so
/// callers can report on it without reading the intermediate again.
pub fn load_table(source: &Path, intermediate: &Path) -> Result<RawTable> {
    info!("Loading spreadsheet {}", source.display());

    let table = read_table(source)?;
    write_table(intermediate, &table)?;

    debug!(
        "Wrote {} rows x {} columns to {}",
        table.rows.len(),
        table.headers.len(),
        intermediate.display()
    );

    Ok(table)
}

/// Read `source` into a [`RawTable`], picking the decoder by file extension.
///
/// `.csv` goes through the CSV reader; anything else is handed to calamine,
/// which recognises xlsx, xlsm, xlsb, xls and ods.
pub fn read_table(source: &Path) -> Result<RawTable> {
    if !source.is_file() {
        return Err(PipelineError::source_unavailable(
            source,
            "file does not exist",
        ));
    }

    let is_csv = source
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);

    if is_csv {
        // A source that does not decode is unavailable, not a pipeline fault.
        read_csv_table(source).map_err(|e| match e {
            PipelineError::Csv(e) => PipelineError::source_unavailable(source, e),
            other => other,
        })
    } else {
        read_workbook(source)
    }
}

/// Read a CSV file with a header row into a [`RawTable`].
///
/// Rows may be ragged; short rows are padded with empty cells.
pub fn read_csv_table(path: &Path) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(|e| PipelineError::source_unavailable(path, e))?;

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() {
        return Err(PipelineError::source_unavailable(path, "no header row"));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable::new(headers, rows))
}

/// Serialize `table` as CSV (header row first) and write it to `path`.
pub fn write_table(path: &Path, table: &RawTable) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());

    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| PipelineError::write_failure(path, e.into_error()))?;

    write_atomic(path, &bytes)
}

/// Render a workbook cell as the text that lands in the CSV intermediate.
pub fn render_cell(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.clone(),
        Data::Bool(b) => b.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) => render_float(*f),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|naive| naive.format("%Y-%m-%dT%H:%M:%S").to_string())
            .unwrap_or_else(|| render_float(dt.as_f64())),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn read_workbook(path: &Path) -> Result<RawTable> {
    let mut workbook =
        open_workbook_auto(path).map_err(|e| PipelineError::source_unavailable(path, e))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| PipelineError::source_unavailable(path, "workbook has no worksheets"))?
        .map_err(|e| PipelineError::source_unavailable(path, e))?;

    let mut rows = range
        .rows()
        .map(|row| row.iter().map(render_cell).collect::<Vec<String>>());

    let headers = rows
        .next()
        .ok_or_else(|| PipelineError::source_unavailable(path, "worksheet is empty"))?;

    Ok(RawTable::new(headers, rows.collect()))
}

/// Workbooks store every number as a float; print whole values without `.0`.
fn render_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

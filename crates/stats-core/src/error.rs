use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the review statistics pipeline.
///
/// Every variant is fatal to a run: the first one raised halts the pipeline
/// and intermediate files are left where they are.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The input file is missing, unreadable, or not a parseable workbook.
    #[error("Source unavailable at {path}: {reason}")]
    SourceUnavailable { path: PathBuf, reason: String },

    /// One or more columns the cleaner needs are absent from the table.
    #[error("Schema mismatch, missing columns: {}", .missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },

    /// A `created` value could not be parsed into a date-time.
    #[error("Malformed timestamp {value:?} in row {row}")]
    MalformedTimestamp { row: usize, value: String },

    /// A typed cell (boolean or integer) held a value of the wrong shape.
    #[error("Invalid value {value:?} for column {column} in row {row}")]
    InvalidField {
        row: usize,
        column: String,
        value: String,
    },

    /// No records survived cleaning, so nothing can be averaged.
    #[error("Dataset is empty: no valid review records to summarize")]
    EmptyDataset,

    /// An output destination could not be written.
    #[error("Failed to write {path}: {source}")]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed or produced.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The CSV intermediate could not be read.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl PipelineError {
    /// Build a [`PipelineError::SourceUnavailable`] from any displayable cause.
    pub fn source_unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::SourceUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Build a [`PipelineError::WriteFailure`] for `path`.
    pub fn write_failure(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFailure {
            path: path.into(),
            source,
        }
    }
}

/// Convenience alias used throughout the review-stats crates.
pub type Result<T> = std::result::Result<T, PipelineError>;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Column holding the review creation time.
pub const COL_CREATED: &str = "created";
/// Column holding the reviewer's recommendation flag.
pub const COL_VOTED_UP: &str = "voted_up";
/// Column holding the review body.
pub const COL_REVIEW: &str = "review";
/// Column holding whether the product was bought on Steam.
pub const COL_STEAM_PURCHASE: &str = "steam_purchase";
/// Column holding whether the product was received for free.
pub const COL_RECEIVED_FOR_FREE: &str = "received_for_free";
/// Misspelled variant of [`COL_RECEIVED_FOR_FREE`] found in Steam exports.
pub const COL_RECEIVED_FOR_FREE_LEGACY: &str = "recieved_for_free";
/// Column holding lifetime playtime in minutes.
pub const COL_PLAYTIME_FOREVER: &str = "author_playtime_forever";

/// Columns that must be present, and non-empty per row, for a record to survive.
pub const REQUIRED_COLUMNS: [&str; 2] = [COL_VOTED_UP, COL_REVIEW];

/// What the cleaner does with a `created` value it cannot parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimestampPolicy {
    /// Abort the whole batch with `MalformedTimestamp`.
    #[default]
    Fail,
    /// Exclude the offending record and keep going.
    Drop,
}

/// A single user review after cleaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    /// UTC time the review was posted.
    pub created: DateTime<Utc>,
    /// Whether the reviewer recommended the game.
    pub voted_up: bool,
    /// Review text.
    pub review: String,
    /// Whether the game was purchased on Steam.
    pub steam_purchase: bool,
    /// Whether the game was received for free.
    #[serde(alias = "recieved_for_free")]
    pub received_for_free: bool,
    /// Lifetime playtime in minutes.
    pub author_playtime_forever: u64,
}

impl ReviewRecord {
    /// Lifetime playtime converted to hours.
    pub fn playtime_hours(&self) -> f64 {
        self.author_playtime_forever as f64 / 60.0
    }
}

/// Descriptive statistics over one cleaned dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// 1-based sequential identifiers, one per record.
    pub id: Vec<u64>,
    /// Playtime per record in hours, in record order.
    pub playtime_hours: Vec<f64>,
    /// Sum of `playtime_hours`.
    pub total_hours: f64,
    /// `total_hours / user_count`.
    pub avg_hours: f64,
    pub purchased_count: u64,
    pub not_purchased_count: u64,
    pub free_count: u64,
    /// Number of records summarized.
    pub user_count: u64,
    pub like_count: u64,
    pub avg_like_rate: f64,
    pub dislike_count: u64,
    pub avg_dislike_rate: f64,
}

/// A sheet held in row-oriented form: a header row plus string cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    /// Column names from the first row.
    pub headers: Vec<String>,
    /// Data rows, each padded to `headers.len()` cells.
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    /// Build a table, padding short rows with empty cells.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                if row.len() < width {
                    row.resize(width, String::new());
                }
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Position of `name` among the headers (exact match after trimming).
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }

    /// Position of the first of `names` present among the headers.
    pub fn column_index_any(&self, names: &[&str]) -> Option<usize> {
        names.iter().find_map(|name| self.column_index(name))
    }
}

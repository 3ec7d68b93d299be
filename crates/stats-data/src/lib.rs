//! Pipeline stages for review-stats.
//!
//! Loads the spreadsheet export, cleans it into typed review records,
//! aggregates summary statistics and writes the JSON artifacts consumed by
//! the display application.

pub mod aggregator;
pub mod cleaner;
pub mod exporter;
pub mod loader;
pub mod pipeline;

pub use stats_core as core;

//! Core types for review-stats.
//!
//! Error taxonomy, typed review records, cell parsing, CLI settings and
//! display helpers shared by the data and binary crates.

pub mod data_processors;
pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{PipelineError, Result};

//! Descriptive statistics over cleaned review records.

use std::path::Path;

use stats_core::error::{PipelineError, Result};
use stats_core::models::{ReviewRecord, SummaryStatistics};
use tracing::{debug, info};

use crate::exporter::read_records;

// ── ReviewTally ───────────────────────────────────────────────────────────────

/// Running counts accumulated one record at a time.
#[derive(Debug, Clone, Default)]
pub struct ReviewTally {
    pub likes: u64,
    pub dislikes: u64,
    pub purchased: u64,
    pub not_purchased: u64,
    pub free: u64,
    pub playtime_hours: Vec<f64>,
}

impl ReviewTally {
    /// Add a single record to the running totals.
    pub fn add_record(&mut self, record: &ReviewRecord) {
        if record.voted_up {
            self.likes += 1;
        } else {
            self.dislikes += 1;
        }

        if record.steam_purchase {
            self.purchased += 1;
        } else {
            self.not_purchased += 1;
        }

        if record.received_for_free {
            self.free += 1;
        }

        self.playtime_hours.push(record.playtime_hours());
    }

    /// Number of records added so far.
    pub fn count(&self) -> u64 {
        self.playtime_hours.len() as u64
    }

    /// Sum of the per-record playtime values.
    pub fn total_hours(&self) -> f64 {
        self.playtime_hours.iter().sum()
    }

    /// Turn the tally into the final statistics object.
    ///
    /// Fails with [`PipelineError::EmptyDataset`] when no records were added.
    pub fn finish(self) -> Result<SummaryStatistics> {
        let user_count = self.count();
        if user_count == 0 {
            return Err(PipelineError::EmptyDataset);
        }

        let users = user_count as f64;
        let total_hours = self.total_hours();

        Ok(SummaryStatistics {
            id: (1..=user_count).collect(),
            total_hours,
            avg_hours: total_hours / users,
            purchased_count: self.purchased,
            not_purchased_count: self.not_purchased,
            free_count: self.free,
            user_count,
            like_count: self.likes,
            avg_like_rate: self.likes as f64 / users,
            dislike_count: self.dislikes,
            avg_dislike_rate: self.dislikes as f64 / users,
            playtime_hours: self.playtime_hours,
        })
    }
}

// ── ReviewAggregator ──────────────────────────────────────────────────────────

/// Stateless helper that summarizes a cleaned dataset.
pub struct ReviewAggregator;

impl ReviewAggregator {
    /// Compute summary statistics over `records`, preserving record order in
    /// the per-record lists.
    pub fn summarize(records: &[ReviewRecord]) -> Result<SummaryStatistics> {
        let mut tally = ReviewTally::default();
        for record in records {
            tally.add_record(record);
        }

        let summary = tally.finish()?;
        debug!(
            "Summarized {} records: {} likes, {} purchased, {:.2} total hours",
            summary.user_count, summary.like_count, summary.purchased_count, summary.total_hours
        );
        Ok(summary)
    }

    /// Read the cleaned-record document at `path` and summarize it.
    pub fn summarize_file(path: &Path) -> Result<SummaryStatistics> {
        info!("Aggregating cleaned records from {}", path.display());
        let records = read_records(path)?;
        Self::summarize(&records)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn make_record(voted_up: bool, purchased: bool, free: bool, minutes: u64) -> ReviewRecord {
        ReviewRecord {
            created: Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap(),
            voted_up,
            review: "text".to_string(),
            steam_purchase: purchased,
            received_for_free: free,
            author_playtime_forever: minutes,
        }
    }

    fn scenario_a() -> Vec<ReviewRecord> {
        vec![
            make_record(true, true, false, 60),
            make_record(true, false, false, 120),
            make_record(false, true, true, 180),
        ]
    }

    // ── summarize ─────────────────────────────────────────────────────────────

    #[test]
    fn test_summarize_three_reviews() {
        let summary = ReviewAggregator::summarize(&scenario_a()).unwrap();

        assert_eq!(summary.user_count, 3);
        assert_eq!(summary.like_count, 2);
        assert_eq!(summary.dislike_count, 1);
        assert_eq!(summary.purchased_count, 2);
        assert_eq!(summary.not_purchased_count, 1);
        assert_eq!(summary.free_count, 1);
        assert_eq!(summary.playtime_hours, vec![1.0, 2.0, 3.0]);
        assert_eq!(summary.id, vec![1, 2, 3]);
        assert_eq!(summary.total_hours, 6.0);
        assert_eq!(summary.avg_hours, 2.0);
        assert!((summary.avg_like_rate - 2.0 / 3.0).abs() < 1e-12);
        assert!((summary.avg_dislike_rate - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_total_hours_sums_values_not_positions() {
        // Positions would sum to 0 + 1 = 1; the playtime values sum to 10.
        let records = vec![make_record(true, true, false, 300), make_record(true, true, false, 300)];
        let summary = ReviewAggregator::summarize(&records).unwrap();

        assert_eq!(summary.total_hours, 10.0);
        assert_eq!(summary.avg_hours, 5.0);
    }

    #[test]
    fn test_summarize_counts_partition_users() {
        let records: Vec<ReviewRecord> = (0..17)
            .map(|i| make_record(i % 3 == 0, i % 2 == 0, i % 5 == 0, i * 7))
            .collect();
        let summary = ReviewAggregator::summarize(&records).unwrap();

        assert_eq!(summary.like_count + summary.dislike_count, summary.user_count);
        assert_eq!(
            summary.purchased_count + summary.not_purchased_count,
            summary.user_count
        );
        assert_eq!(summary.avg_hours, summary.total_hours / summary.user_count as f64);
        assert_eq!(summary.id.len(), records.len());
        assert_eq!(summary.playtime_hours.len(), records.len());
    }

    #[test]
    fn test_summarize_fractional_hours() {
        let summary = ReviewAggregator::summarize(&[make_record(false, false, false, 45)]).unwrap();
        assert_eq!(summary.playtime_hours, vec![0.75]);
        assert_eq!(summary.avg_like_rate, 0.0);
        assert_eq!(summary.avg_dislike_rate, 1.0);
    }

    #[test]
    fn test_summarize_empty_is_error() {
        let err = ReviewAggregator::summarize(&[]).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyDataset));
    }

    // ── ReviewTally ───────────────────────────────────────────────────────────

    #[test]
    fn test_tally_add_record() {
        let mut tally = ReviewTally::default();
        tally.add_record(&make_record(true, false, true, 90));

        assert_eq!(tally.likes, 1);
        assert_eq!(tally.not_purchased, 1);
        assert_eq!(tally.free, 1);
        assert_eq!(tally.count(), 1);
        assert_eq!(tally.total_hours(), 1.5);
    }

    // ── summarize_file ────────────────────────────────────────────────────────

    #[test]
    fn test_summarize_file_reads_cleaned_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("intermediate.csv");
        std::fs::write(&path, serde_json::to_vec(&scenario_a()).unwrap()).unwrap();

        let summary = ReviewAggregator::summarize_file(&path).unwrap();
        assert_eq!(summary.user_count, 3);
        assert_eq!(summary.total_hours, 6.0);
    }

    #[test]
    fn test_summarize_file_empty_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("intermediate.csv");
        std::fs::write(&path, "[]").unwrap();

        let err = ReviewAggregator::summarize_file(&path).unwrap_err();
        assert!(matches!(err, PipelineError::EmptyDataset));
    }
}

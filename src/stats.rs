/// Statistics tracking for box collection building
///
/// This module provides structures and utilities for tracking how many input
/// records were accepted or skipped while a `BoxCollection` was built.

use serde::{Deserialize, Serialize};

/// Statistics collected while building a box collection
///
/// Tracks validation failures and accepted records so that records excluded
/// under the skip-and-continue policy remain visible for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionStats {
    /// Total number of records offered to the collection
    pub total_records: usize,

    /// Number of accepted ground-truth records
    pub ground_truths: usize,

    /// Number of accepted detection records
    pub detections: usize,

    /// Number of records skipped due to negative or non-finite geometry
    pub skipped_invalid_geometry: usize,

    /// Number of records skipped due to a missing or out-of-range confidence
    pub skipped_invalid_confidence: usize,
}

impl CollectionStats {
    /// Create a new `CollectionStats` with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment the total records counter
    pub fn add_record(&mut self) {
        self.total_records += 1;
    }

    /// Record an accepted ground-truth box
    pub fn accept_ground_truth(&mut self) {
        self.ground_truths += 1;
    }

    /// Record an accepted detection
    pub fn accept_detection(&mut self) {
        self.detections += 1;
    }

    /// Record a box skipped due to invalid geometry
    pub fn skip_invalid_geometry(&mut self) {
        self.skipped_invalid_geometry += 1;
    }

    /// Record a box skipped due to invalid confidence
    pub fn skip_invalid_confidence(&mut self) {
        self.skipped_invalid_confidence += 1;
    }

    /// Number of records that passed all validation checks
    pub fn valid_records(&self) -> usize {
        self.ground_truths + self.detections
    }

    /// Calculate the total number of skipped records
    pub fn total_skipped(&self) -> usize {
        self.skipped_invalid_geometry + self.skipped_invalid_confidence
    }

    /// Log a summary of the statistics at info level
    pub fn log_summary(&self) {
        log::info!("{}", self.summary_string());
        if self.total_skipped() > 0 {
            log::info!(
                "skipped records: {} invalid geometry, {} invalid confidence",
                self.skipped_invalid_geometry,
                self.skipped_invalid_confidence
            );
        }
    }

    /// Get a formatted string summary of the statistics
    pub fn summary_string(&self) -> String {
        format!(
            "CollectionStats {{ total: {}, ground_truths: {}, detections: {}, skipped: {} }}",
            self.total_records,
            self.ground_truths,
            self.detections,
            self.total_skipped()
        )
    }
}

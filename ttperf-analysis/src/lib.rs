//! TTNN Performance Analysis Pipeline
//!
//! This crate turns dated benchmark snapshots of TT-Metal eltwise operations
//! into an analyzable operation x date performance matrix. It provides:
//! - Paginated snapshot loading with partial-failure tolerance
//! - Deterministic operation taxonomy classification
//! - Matrix building with significance-based column selection
//! - Day-over-day delta grading and trend classification
//! - Search/filter/sort view derivation and CSV export

pub mod config;
pub mod error;
pub mod export;
pub mod grading;
pub mod loader;
pub mod matrix;
pub mod significance;
pub mod summary;
pub mod taxonomy;
pub mod view;

use serde::{Deserialize, Serialize};

pub use error::{PerfError, Result};

/// Operation retired from tracking. It still appears in old snapshot files
/// but is excluded from the matrix, summary statistics, and daily averages.
pub const RETIRED_OPERATION: &str = "argmax";

/// Metadata for one measurement run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    pub measurement_date: String,
    pub git_commit_id: String,
    pub total_tests: u64,
    pub successful_tests: u64,
    pub failed_tests: u64,
}

impl SnapshotMetadata {
    /// Short (8 character) form of the git commit id.
    pub fn short_commit(&self) -> &str {
        prefix(&self.git_commit_id, 8)
    }

    /// Calendar-day portion of the measurement date, used as the column label.
    pub fn date_label(&self) -> &str {
        prefix(&self.measurement_date, 10)
    }
}

/// First `max_bytes` of `s`. These fields arrive from external JSON, so the
/// cut must not land inside a multi-byte character; when it would, the whole
/// string is returned instead.
fn prefix(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    s.get(..max_bytes).unwrap_or(s)
}

/// One benchmarked operation within a snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Measurement {
    pub operation_name: String,
    pub test_name: String,
    pub average_duration_ns: f64,
    pub min_duration_ns: f64,
    pub max_duration_ns: f64,
    pub std_deviation_ns: f64,
    pub successful_runs: u64,
    pub timestamp: String,
}

/// One complete dated benchmark run. Immutable once fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub metadata: SnapshotMetadata,
    pub results: Vec<Measurement>,
}

/// A single cell of the performance matrix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceEntry {
    pub duration_ns: f64,
    pub successful_runs: u64,
    pub test_name: String,
}

impl From<&Measurement> for PerformanceEntry {
    fn from(m: &Measurement) -> Self {
        Self {
            duration_ns: m.average_duration_ns,
            successful_runs: m.successful_runs,
            test_name: m.test_name.clone(),
        }
    }
}

/// One date column of the matrix: a calendar-day label plus the short commit
/// id of the snapshot that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateColumn {
    pub label: String,
    pub short_commit: String,
}

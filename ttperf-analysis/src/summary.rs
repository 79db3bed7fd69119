//! Single-day summary statistics and the daily leaderboard
//!
//! These views are derived from the latest snapshot only and are
//! independent of the matrix. The retired operation is excluded from the
//! aggregate numbers, matching the matrix row set.

use crate::{Snapshot, RETIRED_OPERATION};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse single-day rating for one operation, bucketed on its average
/// duration: under 10ms excellent, under 25ms good, under 50ms fair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerformanceRating {
    Excellent,
    Good,
    Fair,
    NeedsWork,
}

impl fmt::Display for PerformanceRating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PerformanceRating::Excellent => "excellent",
            PerformanceRating::Good => "good",
            PerformanceRating::Fair => "fair",
            PerformanceRating::NeedsWork => "needs-work",
        };
        f.write_str(label)
    }
}

/// Rating for an average duration in nanoseconds.
pub fn rating_for(duration_ns: f64) -> PerformanceRating {
    let ms = duration_ns / 1_000_000.0;
    if ms < 10.0 {
        PerformanceRating::Excellent
    } else if ms < 25.0 {
        PerformanceRating::Good
    } else if ms < 50.0 {
        PerformanceRating::Fair
    } else {
        PerformanceRating::NeedsWork
    }
}

/// Summary-statistics record for the latest measurement run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryStats {
    pub total_tests: u64,
    pub successful_tests: u64,
    pub failed_tests: u64,
    /// Successful tests as a percentage of total tests.
    pub success_rate: f64,
    pub total_operations: usize,
    /// Mean of per-operation average durations, in milliseconds.
    pub avg_duration_ms: f64,
    pub fastest_operation: String,
    pub slowest_operation: String,
    pub last_updated: String,
    /// Short commit id of the latest run.
    pub git_commit: String,
}

/// Compute summary statistics from the latest snapshot. `None` when the
/// snapshot has no usable results; callers render that as an empty state.
pub fn summary_stats(latest: &Snapshot) -> Option<SummaryStats> {
    let results: Vec<_> = latest
        .results
        .iter()
        .filter(|r| r.operation_name != RETIRED_OPERATION)
        .collect();
    if results.is_empty() {
        return None;
    }

    let total_operations = results.len();
    let avg_duration_ms = results
        .iter()
        .map(|r| r.average_duration_ns)
        .sum::<f64>()
        / total_operations as f64
        / 1_000_000.0;

    let fastest = results
        .iter()
        .min_by(|a, b| {
            a.average_duration_ns
                .partial_cmp(&b.average_duration_ns)
                .unwrap_or(std::cmp::Ordering::Equal)
        })?
        .operation_name
        .clone();
    let slowest = results
        .iter()
        .max_by(|a, b| {
            a.average_duration_ns
                .partial_cmp(&b.average_duration_ns)
                .unwrap_or(std::cmp::Ordering::Equal)
        })?
        .operation_name
        .clone();

    let metadata = &latest.metadata;
    let success_rate = if metadata.total_tests > 0 {
        metadata.successful_tests as f64 / metadata.total_tests as f64 * 100.0
    } else {
        0.0
    };

    Some(SummaryStats {
        total_tests: metadata.total_tests,
        successful_tests: metadata.successful_tests,
        failed_tests: metadata.failed_tests,
        success_rate,
        total_operations,
        avg_duration_ms,
        fastest_operation: fastest,
        slowest_operation: slowest,
        last_updated: metadata.measurement_date.clone(),
        git_commit: metadata.short_commit().to_string(),
    })
}

/// One leaderboard entry: the latest-day measurement of a single operation
/// with millisecond conversions and a rating attached.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub operation_name: String,
    pub test_name: String,
    pub average_duration_ns: f64,
    pub average_duration_ms: f64,
    pub min_duration_ms: f64,
    pub max_duration_ms: f64,
    pub std_deviation_ms: f64,
    pub successful_runs: u64,
    pub timestamp: String,
    pub rating: PerformanceRating,
}

/// Flat single-day operation list for the leaderboard view. Keeps every
/// measured operation, including the retired one: the leaderboard shows
/// the raw run, the matrix applies the exclusion.
pub fn operation_leaderboard(latest: &Snapshot) -> Vec<LeaderboardEntry> {
    latest
        .results
        .iter()
        .map(|r| LeaderboardEntry {
            operation_name: r.operation_name.clone(),
            test_name: r.test_name.clone(),
            average_duration_ns: r.average_duration_ns,
            average_duration_ms: r.average_duration_ns / 1_000_000.0,
            min_duration_ms: r.min_duration_ns / 1_000_000.0,
            max_duration_ms: r.max_duration_ns / 1_000_000.0,
            std_deviation_ms: r.std_deviation_ns / 1_000_000.0,
            successful_runs: r.successful_runs,
            timestamp: r.timestamp.clone(),
            rating: rating_for(r.average_duration_ns),
        })
        .collect()
}

/// Direction of the overall day-over-day movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OverallTrend {
    Improving,
    Degrading,
    Stable,
}

/// Overall comparison of the two most recent measurement days.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyComparison {
    /// Positive when the latest day is faster than the previous one.
    pub improvement_pct: f64,
    pub latest_avg_ms: f64,
    pub previous_avg_ms: f64,
    pub trend: OverallTrend,
}

/// Compare the mean operation duration of the last two days. `None` with
/// fewer than two snapshots.
pub fn compare_daily(snapshots: &[Snapshot]) -> Option<DailyComparison> {
    if snapshots.len() < 2 {
        return None;
    }
    let mut ordered: Vec<&Snapshot> = snapshots.iter().collect();
    ordered.sort_by(|a, b| {
        a.metadata
            .date_label()
            .cmp(b.metadata.date_label())
            .then_with(|| a.metadata.measurement_date.cmp(&b.metadata.measurement_date))
    });

    let latest_avg_ms = mean_duration_ms(ordered[ordered.len() - 1]);
    let previous_avg_ms = mean_duration_ms(ordered[ordered.len() - 2]);
    if previous_avg_ms == 0.0 {
        return None;
    }

    let improvement_pct = (previous_avg_ms - latest_avg_ms) / previous_avg_ms * 100.0;
    let trend = if improvement_pct > 0.0 {
        OverallTrend::Improving
    } else if improvement_pct < 0.0 {
        OverallTrend::Degrading
    } else {
        OverallTrend::Stable
    };

    Some(DailyComparison {
        improvement_pct,
        latest_avg_ms,
        previous_avg_ms,
        trend,
    })
}

fn mean_duration_ms(snapshot: &Snapshot) -> f64 {
    let durations: Vec<f64> = snapshot
        .results
        .iter()
        .filter(|r| r.operation_name != RETIRED_OPERATION)
        .map(|r| r.average_duration_ns)
        .collect();
    if durations.is_empty() {
        return 0.0;
    }
    durations.iter().sum::<f64>() / durations.len() as f64 / 1_000_000.0
}

/// Human-readable duration: microseconds below 1ms, milliseconds below 1s,
/// seconds above.
pub fn format_duration_ns(nanoseconds: f64) -> String {
    let ms = nanoseconds / 1_000_000.0;
    if ms < 1.0 {
        format!("{:.1}\u{03bc}s", nanoseconds / 1_000.0)
    } else if ms < 1000.0 {
        format!("{ms:.3}ms")
    } else {
        format!("{:.2}s", ms / 1000.0)
    }
}

//! Significance-based column selection
//!
//! By default the comparison view hides date columns on which nothing much
//! happened. A column survives when enough operations moved against the
//! previous column; the first and last columns are always shown so the full
//! measured range stays visible.

use crate::matrix::PerformanceMatrix;

/// Percent change at or below which a day-over-day move counts as a
/// significant improvement.
pub const IMPROVEMENT_THRESHOLD_PCT: f64 = -5.0;

/// Percent change at or above which a day-over-day move counts as a
/// significant regression. Asymmetric on purpose: improvements count
/// sooner than degradations.
pub const REGRESSION_THRESHOLD_PCT: f64 = 10.0;

/// Fraction of comparable operations that must move significantly for an
/// interior column to be retained.
pub const SIGNIFICANT_FRACTION: f64 = 0.10;

/// Select the matrix column indices shown by default.
///
/// The first and last columns are always retained. An interior column `i`
/// is retained when the number of operations whose percent change from
/// column `i - 1` reaches a threshold of at least
/// `max(1, floor(SIGNIFICANT_FRACTION * comparable))`, where `comparable`
/// counts operations with data on both days.
pub fn select_columns(matrix: &PerformanceMatrix) -> Vec<usize> {
    let n = matrix.columns.len();
    if n <= 2 {
        return (0..n).collect();
    }

    let mut selected = vec![0];
    for i in 1..n - 1 {
        if column_is_significant(matrix, i) {
            selected.push(i);
        }
    }
    selected.push(n - 1);
    selected
}

fn column_is_significant(matrix: &PerformanceMatrix, column: usize) -> bool {
    let mut comparable = 0usize;
    let mut significant = 0usize;

    for row in &matrix.rows {
        let previous = row.cells[column - 1].as_ref().map(|e| e.duration_ns);
        let current = row.cells[column].as_ref().map(|e| e.duration_ns);
        if let (Some(previous), Some(current)) = (previous, current) {
            if previous <= 0.0 {
                continue;
            }
            comparable += 1;
            let pct = (current - previous) / previous * 100.0;
            if pct <= IMPROVEMENT_THRESHOLD_PCT || pct >= REGRESSION_THRESHOLD_PCT {
                significant += 1;
            }
        }
    }

    let required = ((SIGNIFICANT_FRACTION * comparable as f64).floor() as usize).max(1);
    significant >= required
}

//! Performance matrix construction
//!
//! The matrix is a pure derived value: it is rebuilt from the full snapshot
//! set whenever that set changes and is never patched in place, so loading
//! can interleave freely with recomputation.

use crate::taxonomy::{classify, Category};
use crate::{DateColumn, PerformanceEntry, Snapshot, RETIRED_OPERATION};
use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap};

/// One operation row: the name, its fixed category, and one cell per date
/// column. `None` marks a date with no measurement for this operation;
/// absence is a distinct value and is never coerced to zero.
#[derive(Debug, Clone)]
pub struct OperationRow {
    pub name: String,
    pub category: Category,
    pub cells: Vec<Option<PerformanceEntry>>,
}

/// The operation x date performance matrix.
#[derive(Debug, Clone, Default)]
pub struct PerformanceMatrix {
    pub columns: Vec<DateColumn>,
    pub rows: Vec<OperationRow>,
}

impl PerformanceMatrix {
    /// Build the matrix from a set of snapshots.
    ///
    /// Snapshots are sorted ascending by measurement date. When two
    /// snapshots resolve to the same displayed date, the later one in sort
    /// order wins the whole column, independent of fetch arrival order.
    /// The retired operation is excluded from the row set even when present
    /// in raw results.
    pub fn build(snapshots: &[Snapshot]) -> Self {
        let mut ordered: Vec<&Snapshot> = snapshots.iter().collect();
        ordered.sort_by(|a, b| {
            sort_key(a)
                .cmp(&sort_key(b))
                .then_with(|| a.metadata.measurement_date.cmp(&b.metadata.measurement_date))
        });

        // Collapse duplicate dates: later in sort order overwrites.
        let mut labels: Vec<String> = Vec::new();
        let mut winners: HashMap<String, &Snapshot> = HashMap::new();
        for snapshot in &ordered {
            let label = snapshot.metadata.date_label().to_string();
            if !winners.contains_key(&label) {
                labels.push(label.clone());
            }
            winners.insert(label, snapshot);
        }

        let columns: Vec<DateColumn> = labels
            .iter()
            .map(|label| DateColumn {
                label: label.clone(),
                short_commit: winners[label].metadata.short_commit().to_string(),
            })
            .collect();

        let mut names: BTreeSet<&str> = BTreeSet::new();
        for snapshot in &ordered {
            for measurement in &snapshot.results {
                if measurement.operation_name != RETIRED_OPERATION {
                    names.insert(measurement.operation_name.as_str());
                }
            }
        }

        // Per-column lookup from operation name to measurement. A repeated
        // name within one snapshot resolves to its last occurrence.
        let by_column: Vec<HashMap<&str, PerformanceEntry>> = labels
            .iter()
            .map(|label| {
                winners[label]
                    .results
                    .iter()
                    .map(|m| (m.operation_name.as_str(), PerformanceEntry::from(m)))
                    .collect()
            })
            .collect();

        let rows = names
            .into_iter()
            .map(|name| OperationRow {
                name: name.to_string(),
                category: classify(name),
                cells: by_column.iter().map(|col| col.get(name).cloned()).collect(),
            })
            .collect();

        Self { columns, rows }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    /// Cell duration for a row at a matrix column index, if present.
    pub fn duration_at(&self, row: usize, column: usize) -> Option<f64> {
        self.rows
            .get(row)
            .and_then(|r| r.cells.get(column))
            .and_then(|cell| cell.as_ref())
            .map(|entry| entry.duration_ns)
    }
}

/// Sort key for snapshot ordering: the parsed calendar day when the date
/// label is well formed. Unparseable labels sort after all parseable ones,
/// ordered among themselves by raw text.
fn sort_key(snapshot: &Snapshot) -> (bool, Option<NaiveDate>, &str) {
    let date = NaiveDate::parse_from_str(snapshot.metadata.date_label(), "%Y-%m-%d").ok();
    (date.is_none(), date, &snapshot.metadata.measurement_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Measurement, SnapshotMetadata};

    fn measurement(name: &str, duration_ns: f64) -> Measurement {
        Measurement {
            operation_name: name.to_string(),
            test_name: format!("test_{name}"),
            average_duration_ns: duration_ns,
            min_duration_ns: duration_ns * 0.9,
            max_duration_ns: duration_ns * 1.1,
            std_deviation_ns: duration_ns * 0.05,
            successful_runs: 10,
            timestamp: "2024-03-01T06:00:00Z".to_string(),
        }
    }

    fn snapshot(date: &str, commit: &str, results: Vec<Measurement>) -> Snapshot {
        Snapshot {
            metadata: SnapshotMetadata {
                measurement_date: date.to_string(),
                git_commit_id: commit.to_string(),
                total_tests: results.len() as u64,
                successful_tests: results.len() as u64,
                failed_tests: 0,
            },
            results,
        }
    }

    #[test]
    fn columns_are_date_ordered_regardless_of_arrival() {
        let snapshots = vec![
            snapshot("2024-03-03", "ccc33333", vec![measurement("add", 120.0)]),
            snapshot("2024-03-01", "aaa11111", vec![measurement("add", 100.0)]),
            snapshot("2024-03-02", "bbb22222", vec![measurement("add", 110.0)]),
        ];
        let matrix = PerformanceMatrix::build(&snapshots);
        let labels: Vec<&str> = matrix.columns.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["2024-03-01", "2024-03-02", "2024-03-03"]);
        assert_eq!(matrix.duration_at(0, 0), Some(100.0));
        assert_eq!(matrix.duration_at(0, 2), Some(120.0));
    }

    #[test]
    fn unparseable_dates_sort_after_parseable_ones() {
        let snapshots = vec![
            snapshot("not-a-date", "ddd44444", vec![measurement("add", 300.0)]),
            snapshot("2024-03-02", "bbb22222", vec![measurement("add", 110.0)]),
            snapshot("2024-03-01", "aaa11111", vec![measurement("add", 100.0)]),
        ];
        let matrix = PerformanceMatrix::build(&snapshots);
        let labels: Vec<&str> = matrix.columns.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, vec!["2024-03-01", "2024-03-02", "not-a-date"]);
    }

    #[test]
    fn duplicate_date_later_sorted_snapshot_wins() {
        // Same displayed day, differing timestamps; the later one must own
        // the column, never an average and never the earlier value.
        let snapshots = vec![
            snapshot(
                "2024-03-01T18:00:00Z",
                "fffeeeee",
                vec![measurement("add", 200.0)],
            ),
            snapshot(
                "2024-03-01T06:00:00Z",
                "aaa11111",
                vec![measurement("add", 100.0)],
            ),
        ];
        let matrix = PerformanceMatrix::build(&snapshots);
        assert_eq!(matrix.columns.len(), 1);
        assert_eq!(matrix.columns[0].short_commit, "fffeeeee");
        assert_eq!(matrix.duration_at(0, 0), Some(200.0));
    }

    #[test]
    fn retired_operation_never_appears() {
        let snapshots = vec![snapshot(
            "2024-03-01",
            "aaa11111",
            vec![measurement("argmax", 500.0), measurement("add", 100.0)],
        )];
        let matrix = PerformanceMatrix::build(&snapshots);
        assert_eq!(matrix.rows.len(), 1);
        assert_eq!(matrix.rows[0].name, "add");
    }

    #[test]
    fn missing_measurements_are_absent_not_zero() {
        let snapshots = vec![
            snapshot("2024-03-01", "aaa11111", vec![measurement("add", 100.0)]),
            snapshot(
                "2024-03-02",
                "bbb22222",
                vec![measurement("add", 110.0), measurement("relu", 90.0)],
            ),
        ];
        let matrix = PerformanceMatrix::build(&snapshots);
        let relu = matrix.rows.iter().find(|r| r.name == "relu").unwrap();
        assert!(relu.cells[0].is_none());
        assert_eq!(relu.cells[1].as_ref().unwrap().duration_ns, 90.0);
    }

    #[test]
    fn rows_carry_taxonomy_categories() {
        let snapshots = vec![snapshot(
            "2024-03-01",
            "aaa11111",
            vec![measurement("add", 100.0), measurement("sum_bw", 300.0)],
        )];
        let matrix = PerformanceMatrix::build(&snapshots);
        let add = matrix.rows.iter().find(|r| r.name == "add").unwrap();
        let sum_bw = matrix.rows.iter().find(|r| r.name == "sum_bw").unwrap();
        assert_eq!(add.category, Category::BinaryArithmetic);
        assert_eq!(sum_bw.category, Category::ReductionBackward);
    }

    #[test]
    fn empty_input_builds_empty_matrix() {
        let matrix = PerformanceMatrix::build(&[]);
        assert!(matrix.is_empty());
        assert!(matrix.columns.is_empty());
    }
}

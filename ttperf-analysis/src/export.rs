//! CSV export of the performance matrix
//!
//! Export is a pure function of the matrix and a view state captured at
//! invocation time; it never mutates the live filter/sort state, so
//! concurrent exports cannot interfere with each other or with the table.

use crate::matrix::PerformanceMatrix;
use crate::view::{displayed_columns, visible_rows, ViewState};
use crate::Result;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Time unit for exported durations, with fixed display precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
}

impl TimeUnit {
    pub fn suffix(&self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "ns",
            TimeUnit::Microseconds => "\u{03bc}s",
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "s",
        }
    }

    pub fn precision(&self) -> usize {
        match self {
            TimeUnit::Nanoseconds => 0,
            TimeUnit::Microseconds => 1,
            TimeUnit::Milliseconds => 3,
            TimeUnit::Seconds => 6,
        }
    }

    pub fn convert(&self, nanoseconds: f64) -> f64 {
        match self {
            TimeUnit::Nanoseconds => nanoseconds,
            TimeUnit::Microseconds => nanoseconds / 1_000.0,
            TimeUnit::Milliseconds => nanoseconds / 1_000_000.0,
            TimeUnit::Seconds => nanoseconds / 1_000_000_000.0,
        }
    }

    /// Render a duration with this unit's precision and suffix.
    pub fn format(&self, nanoseconds: f64) -> String {
        format!(
            "{:.*}{}",
            self.precision(),
            self.convert(nanoseconds),
            self.suffix()
        )
    }
}

/// Which date columns an export covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportScope {
    /// The columns currently displayed (significance filter applied unless
    /// the view shows all columns).
    CurrentView,
    /// Only the most recent date column.
    LatestOnly,
    /// Every date column, ignoring the significance filter.
    AllColumns,
}

impl ExportScope {
    /// Slug used in export file names.
    pub fn slug(&self) -> &'static str {
        match self {
            ExportScope::CurrentView => "current-view",
            ExportScope::LatestOnly => "latest",
            ExportScope::AllColumns => "all-columns",
        }
    }
}

/// Resolve the matrix column indices covered by a scope. Reads the view
/// state, never writes it.
pub fn export_columns(
    matrix: &PerformanceMatrix,
    view: &ViewState,
    scope: ExportScope,
) -> Vec<usize> {
    match scope {
        ExportScope::CurrentView => displayed_columns(matrix, view),
        ExportScope::LatestOnly => match matrix.columns.len() {
            0 => Vec::new(),
            n => vec![n - 1],
        },
        ExportScope::AllColumns => (0..matrix.columns.len()).collect(),
    }
}

/// File name for an export, encoding the scope and the current date.
pub fn export_file_name(scope: ExportScope, date: NaiveDate) -> String {
    format!(
        "ttnn-performance-{}-{}.csv",
        scope.slug(),
        date.format("%Y-%m-%d")
    )
}

/// Serialize the filtered, sorted matrix view to CSV text.
///
/// Header: `Operation, Category`, then one column per chosen date labelled
/// `<date> (<short commit>)`. Absent cells render as the literal `N/A`.
pub fn serialize(
    matrix: &PerformanceMatrix,
    rows: &[usize],
    columns: &[usize],
    unit: TimeUnit,
) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["Operation".to_string(), "Category".to_string()];
    for &column in columns {
        let date_column = &matrix.columns[column];
        header.push(format!("{} ({})", date_column.label, date_column.short_commit));
    }
    writer.write_record(&header)?;

    for &row_index in rows {
        let row = &matrix.rows[row_index];
        let mut record = vec![row.name.clone(), row.category.to_string()];
        for &column in columns {
            let cell = row
                .cells
                .get(column)
                .and_then(|cell| cell.as_ref())
                .map(|entry| unit.format(entry.duration_ns))
                .unwrap_or_else(|| "N/A".to_string());
            record.push(cell);
        }
        writer.write_record(&record)?;
    }

    let buffer = writer
        .into_inner()
        .map_err(|e| crate::PerfError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Export the matrix under a scope: the visible rows of the captured view,
/// the scope's columns, and a file name for the download.
pub fn export_view(
    matrix: &PerformanceMatrix,
    view: &ViewState,
    scope: ExportScope,
    unit: TimeUnit,
    today: NaiveDate,
) -> Result<(String, String)> {
    let displayed = displayed_columns(matrix, view);
    let rows = visible_rows(matrix, view, &displayed);
    let columns = export_columns(matrix, view, scope);
    let csv = serialize(matrix, &rows, &columns, unit)?;
    Ok((export_file_name(scope, today), csv))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::SortMode;
    use crate::{Measurement, Snapshot, SnapshotMetadata};
    use std::collections::BTreeSet;

    fn snapshot(date: &str, commit: &str, ops: &[(&str, f64)]) -> Snapshot {
        Snapshot {
            metadata: SnapshotMetadata {
                measurement_date: date.to_string(),
                git_commit_id: commit.to_string(),
                total_tests: ops.len() as u64,
                successful_tests: ops.len() as u64,
                failed_tests: 0,
            },
            results: ops
                .iter()
                .map(|(name, duration)| Measurement {
                    operation_name: name.to_string(),
                    test_name: format!("test_{name}"),
                    average_duration_ns: *duration,
                    min_duration_ns: *duration,
                    max_duration_ns: *duration,
                    std_deviation_ns: 0.0,
                    successful_runs: 5,
                    timestamp: date.to_string(),
                })
                .collect(),
        }
    }

    fn sample_matrix() -> PerformanceMatrix {
        PerformanceMatrix::build(&[
            snapshot("2024-03-01", "aaaa1111bbbb", &[("add", 1500.0), ("relu", 900.0)]),
            snapshot("2024-03-02", "cccc2222dddd", &[("add", 1500.0), ("relu", 900.0)]),
            snapshot("2024-03-03", "eeee3333ffff", &[("add", 1600.0)]),
        ])
    }

    #[test]
    fn unit_precision_and_suffixes() {
        assert_eq!(TimeUnit::Nanoseconds.format(1500.0), "1500ns");
        assert_eq!(TimeUnit::Microseconds.format(1500.0), "1.5\u{03bc}s");
        assert_eq!(TimeUnit::Milliseconds.format(1_500_000.0), "1.500ms");
        assert_eq!(TimeUnit::Seconds.format(1_500_000_000.0), "1.500000s");
    }

    #[test]
    fn header_includes_labels_and_short_commits() {
        let matrix = sample_matrix();
        let view = ViewState {
            show_all_columns: true,
            ..ViewState::default()
        };
        let columns = export_columns(&matrix, &view, ExportScope::AllColumns);
        let rows = visible_rows(&matrix, &view, &columns);
        let csv = serialize(&matrix, &rows, &columns, TimeUnit::Nanoseconds).unwrap();
        let header = csv.lines().next().unwrap();
        assert_eq!(
            header,
            "Operation,Category,2024-03-01 (aaaa1111),2024-03-02 (cccc2222),2024-03-03 (eeee3333)"
        );
    }

    #[test]
    fn absent_cells_render_as_na() {
        let matrix = sample_matrix();
        let view = ViewState {
            show_all_columns: true,
            ..ViewState::default()
        };
        let columns = export_columns(&matrix, &view, ExportScope::AllColumns);
        let rows = visible_rows(&matrix, &view, &columns);
        let csv = serialize(&matrix, &rows, &columns, TimeUnit::Nanoseconds).unwrap();
        let relu_line = csv.lines().find(|l| l.starts_with("relu")).unwrap();
        assert_eq!(relu_line, "relu,Unary,900ns,900ns,N/A");
    }

    #[test]
    fn latest_scope_always_one_data_column() {
        let matrix = sample_matrix();
        // An aggressive filter and sort must not change the column count.
        let view = ViewState {
            search: "re".to_string(),
            categories: BTreeSet::from([crate::taxonomy::Category::Unary]),
            sort: SortMode::MostDegraded,
            ..ViewState::default()
        };
        let columns = export_columns(&matrix, &view, ExportScope::LatestOnly);
        assert_eq!(columns.len(), 1);
        let rows = visible_rows(&matrix, &view, &displayed_columns(&matrix, &view));
        let csv = serialize(&matrix, &rows, &columns, TimeUnit::Nanoseconds).unwrap();
        for line in csv.lines() {
            assert_eq!(line.split(',').count(), 3, "bad line: {line}");
        }
    }

    #[test]
    fn scope_resolution_does_not_touch_view_state() {
        let matrix = sample_matrix();
        let view = ViewState::default();
        let before = view.clone();
        let _ = export_columns(&matrix, &view, ExportScope::AllColumns);
        let _ = export_columns(&matrix, &view, ExportScope::LatestOnly);
        assert_eq!(view, before);
    }

    #[test]
    fn file_name_encodes_scope_and_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(
            export_file_name(ExportScope::LatestOnly, date),
            "ttnn-performance-latest-2024-03-05.csv"
        );
        assert_eq!(
            export_file_name(ExportScope::AllColumns, date),
            "ttnn-performance-all-columns-2024-03-05.csv"
        );
    }

    #[test]
    fn export_view_bundles_filename_and_csv() {
        let matrix = sample_matrix();
        let view = ViewState::default();
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let (name, csv) =
            export_view(&matrix, &view, ExportScope::CurrentView, TimeUnit::Microseconds, date)
                .unwrap();
        assert_eq!(name, "ttnn-performance-current-view-2024-03-05.csv");
        assert!(csv.contains("1.5\u{03bc}s"));
    }
}

//! View-state derivation: search, category filter, and sorting
//!
//! All ambient UI state lives in one immutable [`ViewState`] value threaded
//! through pure selector functions. Derived views are plain functions of
//! `(matrix, view)`; `ViewState` implements `PartialEq`/`Clone` so callers
//! can memoize by the state tuple instead of mutating shared globals.

use crate::grading::CompareMode;
use crate::matrix::PerformanceMatrix;
use crate::significance::select_columns;
use crate::taxonomy::Category;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// Active sort mode. Modes are mutually exclusive; selecting a new one
/// replaces the previous (most-recent-wins).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortMode {
    /// Alphabetical by operation name.
    ByName { descending: bool },
    /// By duration on one matrix column. Rows without a value on that
    /// column sort as +infinity and therefore land last under both
    /// directions.
    ByColumn { column: usize, descending: bool },
    /// Rank by percent change between the last two displayed columns,
    /// most improved first. A missing side counts as zero change.
    MostImproved,
    /// As [`SortMode::MostImproved`], most degraded first.
    MostDegraded,
}

impl Default for SortMode {
    fn default() -> Self {
        SortMode::ByName { descending: false }
    }
}

/// Immutable view state for the comparison table.
///
/// An empty `categories` set means "no category filter": every category
/// passes. This is the documented rule, selecting no categories is not a
/// way to empty the table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ViewState {
    /// Case-insensitive substring match on the operation name.
    pub search: String,
    /// Selected categories; empty means all.
    pub categories: BTreeSet<Category>,
    pub sort: SortMode,
    pub compare_mode: CompareMode,
    /// Bypass the significance filter and show every date column.
    pub show_all_columns: bool,
}

/// Matrix column indices currently displayed under this view state.
pub fn displayed_columns(matrix: &PerformanceMatrix, view: &ViewState) -> Vec<usize> {
    if view.show_all_columns {
        (0..matrix.columns.len()).collect()
    } else {
        select_columns(matrix)
    }
}

/// The visible, ordered row index set for this view state.
pub fn visible_rows(
    matrix: &PerformanceMatrix,
    view: &ViewState,
    displayed: &[usize],
) -> Vec<usize> {
    let needle = view.search.to_lowercase();
    let mut rows: Vec<usize> = matrix
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| {
            let name_matches = needle.is_empty() || row.name.to_lowercase().contains(&needle);
            let category_matches =
                view.categories.is_empty() || view.categories.contains(&row.category);
            name_matches && category_matches
        })
        .map(|(index, _)| index)
        .collect();

    match view.sort {
        SortMode::ByName { descending } => {
            rows.sort_by(|&a, &b| {
                let ordering = matrix.rows[a].name.cmp(&matrix.rows[b].name);
                if descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }
        SortMode::ByColumn { column, descending } => {
            rows.sort_by(|&a, &b| {
                compare_by_column(
                    matrix.duration_at(a, column),
                    matrix.duration_at(b, column),
                    descending,
                )
                .then_with(|| matrix.rows[a].name.cmp(&matrix.rows[b].name))
            });
        }
        SortMode::MostImproved => {
            rows.sort_by(|&a, &b| {
                let change_a = last_pair_change(matrix, a, displayed);
                let change_b = last_pair_change(matrix, b, displayed);
                change_a
                    .partial_cmp(&change_b)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| matrix.rows[a].name.cmp(&matrix.rows[b].name))
            });
        }
        SortMode::MostDegraded => {
            rows.sort_by(|&a, &b| {
                let change_a = last_pair_change(matrix, a, displayed);
                let change_b = last_pair_change(matrix, b, displayed);
                change_b
                    .partial_cmp(&change_a)
                    .unwrap_or(Ordering::Equal)
                    .then_with(|| matrix.rows[a].name.cmp(&matrix.rows[b].name))
            });
        }
    }

    rows
}

/// Column comparison with absent values pinned to the end. A missing cell
/// behaves as +infinity under ascending sort and is explicitly kept last
/// under descending sort too, so direction never moves the gaps around.
fn compare_by_column(a: Option<f64>, b: Option<f64>, descending: bool) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => {
            let ordering = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        }
    }
}

/// Percent change between the last two displayed columns for one row.
/// A missing side ranks the row as unchanged (zero), not excluded.
fn last_pair_change(matrix: &PerformanceMatrix, row: usize, displayed: &[usize]) -> f64 {
    if displayed.len() < 2 {
        return 0.0;
    }
    let previous_column = displayed[displayed.len() - 2];
    let last_column = displayed[displayed.len() - 1];
    match (
        matrix.duration_at(row, previous_column),
        matrix.duration_at(row, last_column),
    ) {
        (Some(previous), Some(last)) if previous > 0.0 => (last - previous) / previous * 100.0,
        _ => 0.0,
    }
}

//! Day-over-day delta grading and trend classification
//!
//! Each visible cell is graded against a reference value: either the fixed
//! first displayed column or the immediately preceding displayed column,
//! depending on [`CompareMode`]. The rolling previous-column mode is the
//! canonical default; the trend indicator always follows whichever mode is
//! active so cell shading and trend arrows never disagree.

use crate::matrix::OperationRow;
use serde::{Deserialize, Serialize};

/// Reference used for delta grading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompareMode {
    /// Compare every column against the first displayed column.
    Baseline,
    /// Compare every column against the immediately preceding displayed
    /// column. Canonical default.
    Previous,
}

impl Default for CompareMode {
    fn default() -> Self {
        CompareMode::Previous
    }
}

/// Magnitude tier of a graded change, from barely past the neutral band
/// (`Slight`, 2%) to beyond 25% (`Extreme`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GradeTier {
    Slight,
    Mild,
    Moderate,
    Strong,
    Severe,
    Extreme,
}

/// Severity bucket for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeltaGrade {
    Neutral,
    Improvement(GradeTier),
    Regression(GradeTier),
}

/// Independent trend indicator for one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Trend {
    Better,
    Worse,
    Stable,
}

/// Percent change of `current` against `reference`. `None` when the
/// reference is zero or not finite; there is nothing meaningful to grade
/// against in that case.
pub fn percent_change(current: f64, reference: f64) -> Option<f64> {
    if reference == 0.0 || !reference.is_finite() || !current.is_finite() {
        return None;
    }
    Some((current - reference) / reference * 100.0)
}

/// Grade a cell value against its reference.
///
/// The baseline column is always neutral regardless of the values supplied,
/// and a missing side yields neutral rather than an error. Improvement tiers
/// start at -2% and regression tiers at +5%; the band [-2, +2] is neutral.
pub fn grade(current: Option<f64>, reference: Option<f64>, is_baseline: bool) -> DeltaGrade {
    if is_baseline {
        return DeltaGrade::Neutral;
    }
    let pct = match (current, reference) {
        (Some(current), Some(reference)) => match percent_change(current, reference) {
            Some(pct) => pct,
            None => return DeltaGrade::Neutral,
        },
        _ => return DeltaGrade::Neutral,
    };

    if pct <= -25.0 {
        DeltaGrade::Improvement(GradeTier::Extreme)
    } else if pct <= -20.0 {
        DeltaGrade::Improvement(GradeTier::Severe)
    } else if pct <= -15.0 {
        DeltaGrade::Improvement(GradeTier::Strong)
    } else if pct <= -10.0 {
        DeltaGrade::Improvement(GradeTier::Moderate)
    } else if pct <= -5.0 {
        DeltaGrade::Improvement(GradeTier::Mild)
    } else if pct <= -2.0 {
        DeltaGrade::Improvement(GradeTier::Slight)
    } else if pct <= 2.0 {
        DeltaGrade::Neutral
    } else if pct <= 5.0 {
        DeltaGrade::Regression(GradeTier::Slight)
    } else if pct <= 10.0 {
        DeltaGrade::Regression(GradeTier::Mild)
    } else if pct <= 15.0 {
        DeltaGrade::Regression(GradeTier::Moderate)
    } else if pct <= 20.0 {
        DeltaGrade::Regression(GradeTier::Strong)
    } else if pct <= 25.0 {
        DeltaGrade::Regression(GradeTier::Severe)
    } else {
        DeltaGrade::Regression(GradeTier::Extreme)
    }
}

/// Trend indicator: worse above +5%, better below -5%, stable between.
/// Absent data yields no indicator.
pub fn trend(current: Option<f64>, reference: Option<f64>) -> Option<Trend> {
    let pct = percent_change(current?, reference?)?;
    Some(if pct > 5.0 {
        Trend::Worse
    } else if pct < -5.0 {
        Trend::Better
    } else {
        Trend::Stable
    })
}

/// Reference position within the displayed column list for grading the cell
/// at `pos`. The first displayed column is the baseline and has no
/// reference.
pub fn reference_position(mode: CompareMode, pos: usize) -> Option<usize> {
    if pos == 0 {
        return None;
    }
    match mode {
        CompareMode::Baseline => Some(0),
        CompareMode::Previous => Some(pos - 1),
    }
}

/// Grade one row's cell at display position `pos` over the displayed
/// matrix column indices.
pub fn grade_cell(
    row: &OperationRow,
    displayed: &[usize],
    pos: usize,
    mode: CompareMode,
) -> DeltaGrade {
    let current = cell_duration(row, displayed, pos);
    match reference_position(mode, pos) {
        None => grade(current, None, true),
        Some(ref_pos) => grade(current, cell_duration(row, displayed, ref_pos), false),
    }
}

/// Trend for one row's cell at display position `pos`, using the same
/// reference as [`grade_cell`].
pub fn trend_cell(
    row: &OperationRow,
    displayed: &[usize],
    pos: usize,
    mode: CompareMode,
) -> Option<Trend> {
    let ref_pos = reference_position(mode, pos)?;
    trend(
        cell_duration(row, displayed, pos),
        cell_duration(row, displayed, ref_pos),
    )
}

fn cell_duration(row: &OperationRow, displayed: &[usize], pos: usize) -> Option<f64> {
    let column = *displayed.get(pos)?;
    row.cells.get(column)?.as_ref().map(|e| e.duration_ns)
}

//! Matrix display command and the shared view filter arguments

use crate::client;
use crate::export::UnitArg;
use anyhow::{bail, Result};
use clap::{Args, ValueEnum};
use std::collections::BTreeSet;
use ttperf_analysis::config::LoaderConfig;
use ttperf_analysis::grading::{grade_cell, CompareMode, DeltaGrade, GradeTier};
use ttperf_analysis::matrix::PerformanceMatrix;
use ttperf_analysis::taxonomy::Category;
use ttperf_analysis::view::{displayed_columns, visible_rows, SortMode, ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Name,
    NameDesc,
    Improved,
    Degraded,
}

impl SortArg {
    fn mode(self) -> SortMode {
        match self {
            SortArg::Name => SortMode::ByName { descending: false },
            SortArg::NameDesc => SortMode::ByName { descending: true },
            SortArg::Improved => SortMode::MostImproved,
            SortArg::Degraded => SortMode::MostDegraded,
        }
    }
}

/// Filter and sort options shared by the matrix and export commands.
#[derive(Args)]
pub struct FilterArgs {
    /// Substring filter on operation names (case-insensitive)
    #[arg(short, long, default_value = "")]
    pub search: String,

    /// Restrict to categories (repeatable, e.g. unary, binary-arithmetic)
    #[arg(short = 'C', long = "category")]
    pub categories: Vec<String>,

    /// Sort order
    #[arg(long, value_enum, default_value_t = SortArg::Name)]
    pub sort: SortArg,

    /// Show every date column, bypassing the significance filter
    #[arg(long)]
    pub all_columns: bool,

    /// Grade against the first displayed column instead of the previous one
    #[arg(long)]
    pub baseline: bool,
}

impl FilterArgs {
    pub fn view_state(&self) -> Result<ViewState> {
        let mut categories = BTreeSet::new();
        for raw in &self.categories {
            categories.insert(parse_category(raw)?);
        }
        Ok(ViewState {
            search: self.search.clone(),
            categories,
            sort: self.sort.mode(),
            compare_mode: if self.baseline {
                CompareMode::Baseline
            } else {
                CompareMode::Previous
            },
            show_all_columns: self.all_columns,
        })
    }
}

fn parse_category(raw: &str) -> Result<Category> {
    let wanted = normalize(raw);
    match Category::ALL
        .iter()
        .copied()
        .find(|category| normalize(category.as_str()) == wanted)
    {
        Some(category) => Ok(category),
        None => bail!("unknown category '{raw}'"),
    }
}

fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

#[derive(Args)]
pub struct MatrixArgs {
    /// Number of snapshot files to load
    #[arg(long, conflicts_with = "full")]
    files: Option<usize>,

    /// Load every available snapshot file
    #[arg(long)]
    full: bool,

    /// Time unit for durations
    #[arg(short, long, value_enum, default_value_t = UnitArg::Us)]
    unit: UnitArg,

    #[command(flatten)]
    filter: FilterArgs,
}

pub async fn show(config: LoaderConfig, args: MatrixArgs) -> Result<()> {
    let data = if args.full {
        client::load_full(config).await?
    } else {
        client::load(config, args.files).await?
    };
    let matrix = PerformanceMatrix::build(&data.daily);
    if matrix.is_empty() {
        println!("No snapshot data available.");
        return Ok(());
    }

    let view = args.filter.view_state()?;
    let displayed = displayed_columns(&matrix, &view);
    let rows = visible_rows(&matrix, &view, &displayed);
    let unit = args.unit.unit();

    print!("{:<32} {:<20}", "Operation", "Category");
    for &column in &displayed {
        let date = &matrix.columns[column];
        print!(" {:>24}", format!("{} ({})", date.label, date.short_commit));
    }
    println!();

    for &row_index in &rows {
        let row = &matrix.rows[row_index];
        print!("{:<32} {:<20}", row.name, row.category.to_string());
        for (pos, &column) in displayed.iter().enumerate() {
            let cell = match matrix.duration_at(row_index, column) {
                Some(duration) => format!(
                    "{}{}",
                    unit.format(duration),
                    grade_marker(grade_cell(row, &displayed, pos, view.compare_mode))
                ),
                None => "-".to_string(),
            };
            print!(" {cell:>24}");
        }
        println!();
    }
    println!(
        "{} operations, {} of {} date columns ({} of {} snapshot days loaded)",
        rows.len(),
        displayed.len(),
        matrix.columns.len(),
        data.currently_loaded,
        data.total_available
    );
    Ok(())
}

/// Compact severity marker appended to a graded cell.
fn grade_marker(grade: DeltaGrade) -> &'static str {
    let steps = |tier: GradeTier| match tier {
        GradeTier::Slight | GradeTier::Mild => 1,
        GradeTier::Moderate | GradeTier::Strong => 2,
        GradeTier::Severe | GradeTier::Extreme => 3,
    };
    match grade {
        DeltaGrade::Neutral => "",
        DeltaGrade::Improvement(tier) => ["", " +", " ++", " +++"][steps(tier)],
        DeltaGrade::Regression(tier) => ["", " !", " !!", " !!!"][steps(tier)],
    }
}

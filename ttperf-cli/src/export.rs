//! CSV export command

use crate::client;
use crate::matrix::FilterArgs;
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::fs;
use std::path::PathBuf;
use ttperf_analysis::config::LoaderConfig;
use ttperf_analysis::export::{export_view, ExportScope, TimeUnit};
use ttperf_analysis::matrix::PerformanceMatrix;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UnitArg {
    Ns,
    Us,
    Ms,
    S,
}

impl UnitArg {
    pub fn unit(self) -> TimeUnit {
        match self {
            UnitArg::Ns => TimeUnit::Nanoseconds,
            UnitArg::Us => TimeUnit::Microseconds,
            UnitArg::Ms => TimeUnit::Milliseconds,
            UnitArg::S => TimeUnit::Seconds,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScopeArg {
    /// The columns currently displayed
    CurrentView,
    /// Only the most recent date column
    Latest,
    /// Every date column
    AllColumns,
}

impl ScopeArg {
    fn scope(self) -> ExportScope {
        match self {
            ScopeArg::CurrentView => ExportScope::CurrentView,
            ScopeArg::Latest => ExportScope::LatestOnly,
            ScopeArg::AllColumns => ExportScope::AllColumns,
        }
    }
}

#[derive(Args)]
pub struct ExportArgs {
    /// Date columns to export
    #[arg(long, value_enum, default_value_t = ScopeArg::CurrentView)]
    scope: ScopeArg,

    /// Time unit for exported durations
    #[arg(short, long, value_enum, default_value_t = UnitArg::Ns)]
    unit: UnitArg,

    /// Output directory (defaults to the current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of snapshot files to load
    #[arg(long, conflicts_with = "full")]
    files: Option<usize>,

    /// Load every available snapshot file
    #[arg(long)]
    full: bool,

    #[command(flatten)]
    filter: FilterArgs,
}

pub async fn export(config: LoaderConfig, args: ExportArgs) -> Result<()> {
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
    let today = chrono::Local::now().date_naive();
    let (file_name, csv) =
        export_view(&matrix, &view, args.scope.scope(), args.unit.unit(), today)?;

    let path = match args.output {
        Some(dir) => dir.join(&file_name),
        None => PathBuf::from(&file_name),
    };
    fs::write(&path, &csv).with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote {} ({} lines)", path.display(), csv.lines().count());
    Ok(())
}

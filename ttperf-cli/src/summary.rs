//! Summary, leaderboard, and day-over-day comparison commands

use crate::client;
use anyhow::Result;
use clap::{Args, ValueEnum};
use std::cmp::Ordering;
use ttperf_analysis::config::LoaderConfig;
use ttperf_analysis::summary::{
    compare_daily, format_duration_ns, operation_leaderboard, summary_stats, OverallTrend,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Args)]
pub struct SummaryArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

pub async fn summary(config: LoaderConfig, args: SummaryArgs) -> Result<()> {
    let data = client::load(config, Some(0)).await?;
    let Some(stats) = summary_stats(&data.latest) else {
        println!("No measurement data available.");
        return Ok(());
    };

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
        OutputFormat::Table => {
            println!("Latest run: {} ({})", stats.last_updated, stats.git_commit);
            println!(
                "  Tests:         {} total, {} passed, {} failed ({:.1}% success)",
                stats.total_tests, stats.successful_tests, stats.failed_tests, stats.success_rate
            );
            println!("  Operations:    {}", stats.total_operations);
            println!("  Mean duration: {:.3}ms", stats.avg_duration_ms);
            println!("  Fastest:       {}", stats.fastest_operation);
            println!("  Slowest:       {}", stats.slowest_operation);
            println!("  Snapshot days: {}", data.total_available);
        }
    }
    Ok(())
}

#[derive(Args)]
pub struct LeaderboardArgs {
    /// Number of operations to show
    #[arg(short, long, default_value_t = 20)]
    limit: usize,

    /// Rank slowest first instead of fastest first
    #[arg(long)]
    slowest: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,
}

pub async fn leaderboard(config: LoaderConfig, args: LeaderboardArgs) -> Result<()> {
    let data = client::load(config, Some(0)).await?;
    let mut board = operation_leaderboard(&data.latest);
    board.sort_by(|a, b| {
        a.average_duration_ns
            .partial_cmp(&b.average_duration_ns)
            .unwrap_or(Ordering::Equal)
    });
    if args.slowest {
        board.reverse();
    }
    board.truncate(args.limit);

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&board)?),
        OutputFormat::Table => {
            println!(
                "{:<4} {:<32} {:>12} {:>12} {:>12}",
                "#", "Operation", "Average", "Std dev", "Rating"
            );
            for (rank, entry) in board.iter().enumerate() {
                println!(
                    "{:<4} {:<32} {:>12} {:>12} {:>12}",
                    rank + 1,
                    entry.operation_name,
                    format_duration_ns(entry.average_duration_ns),
                    format_duration_ns(entry.std_deviation_ms * 1_000_000.0),
                    entry.rating.to_string()
                );
            }
        }
    }
    Ok(())
}

#[derive(Args)]
pub struct CompareArgs {
    /// Number of snapshot files to load
    #[arg(long)]
    files: Option<usize>,
}

pub async fn compare(config: LoaderConfig, args: CompareArgs) -> Result<()> {
    let data = client::load(config, args.files).await?;
    let Some(comparison) = compare_daily(&data.daily) else {
        println!("Need at least two measurement days to compare.");
        return Ok(());
    };

    let direction = match comparison.trend {
        OverallTrend::Improving => "improving",
        OverallTrend::Degrading => "degrading",
        OverallTrend::Stable => "stable",
    };
    println!("Previous day mean: {:.3}ms", comparison.previous_avg_ms);
    println!("Latest day mean:   {:.3}ms", comparison.latest_avg_ms);
    println!(
        "Improvement:       {:+.1}% ({direction})",
        comparison.improvement_pct
    );
    Ok(())
}

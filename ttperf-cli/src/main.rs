use clap::{Parser, Subcommand};
use std::process;

mod client;
mod export;
mod matrix;
mod summary;

#[derive(Parser)]
#[command(name = "ttperf")]
#[command(about = "TTNN operation performance analysis")]
#[command(version)]
struct Cli {
    /// Loader configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Override the snapshot base URL
    #[arg(long, global = true, env = "TTPERF_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summary statistics for the latest measurement run
    Summary(summary::SummaryArgs),
    /// Single-day operation leaderboard
    Leaderboard(summary::LeaderboardArgs),
    /// Compare the two most recent measurement days
    Compare(summary::CompareArgs),
    /// Operation by date performance matrix
    Matrix(matrix::MatrixArgs),
    /// Export the performance matrix as CSV
    Export(export::ExportArgs),
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let config = match client::resolve_config(cli.config.as_deref(), cli.base_url) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Summary(args) => summary::summary(config, args).await,
        Commands::Leaderboard(args) => summary::leaderboard(config, args).await,
        Commands::Compare(args) => summary::compare(config, args).await,
        Commands::Matrix(args) => matrix::show(config, args).await,
        Commands::Export(args) => export::export(config, args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

//! Shared loader setup for the CLI commands

use anyhow::{Context, Result};
use std::path::Path;
use tokio::sync::{mpsc, watch};
use tracing::debug;
use ttperf_analysis::config::LoaderConfig;
use ttperf_analysis::loader::{HttpSource, LoadedData, SnapshotLoader};

pub fn resolve_config(path: Option<&str>, base_url: Option<String>) -> Result<LoaderConfig> {
    let mut config = match path {
        Some(path) => LoaderConfig::from_file(Path::new(path))
            .with_context(|| format!("loading configuration from {path}"))?,
        None => LoaderConfig::default(),
    };
    if let Some(base_url) = base_url {
        config.base_url = base_url;
    }
    Ok(config)
}

pub fn loader(config: LoaderConfig) -> SnapshotLoader<HttpSource> {
    SnapshotLoader::new(HttpSource::new(config.clone()), config)
}

/// Run one load cycle. `files` overrides the configured initial file count;
/// zero fetches only the manifest and the latest snapshot. Counts beyond
/// the initial batch are paged in with the configured load-more increment.
pub async fn load(config: LoaderConfig, files: Option<usize>) -> Result<LoadedData> {
    let initial = config.initial_files;
    let increment = config.load_more_increment;
    let target = files.unwrap_or(initial);
    let loader = loader(config);

    let mut data = loader
        .initial_load(target.min(initial))
        .await
        .context("loading snapshot data")?;

    let mut index = target.min(initial).min(data.total_available);
    let target = target.min(data.total_available);
    while index < target {
        let batch_size = increment.min(target - index);
        debug!(index, batch_size, "loading more snapshots");
        let batch = loader.load_more(&data.manifest, index, batch_size).await;
        data.daily.extend(batch);
        index += batch_size;
    }
    data.currently_loaded = data.daily.len();
    Ok(data)
}

/// Load the entire manifest: one initial batch, then background batches
/// streamed until the manifest is exhausted.
pub async fn load_full(config: LoaderConfig) -> Result<LoadedData> {
    let initial = config.initial_files;
    let loader = loader(config);

    let mut data = loader
        .initial_load(initial)
        .await
        .context("loading snapshot data")?;

    let start = initial.min(data.total_available);
    let (tx, mut rx) = mpsc::channel(4);
    let (_shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = loader.spawn_background_load(data.manifest.clone(), start, tx, shutdown_rx);

    while let Some(batch) = rx.recv().await {
        debug!(loaded = data.daily.len() + batch.len(), "background batch arrived");
        data.daily.extend(batch);
    }
    handle.await?;
    data.currently_loaded = data.daily.len();
    Ok(data)
}

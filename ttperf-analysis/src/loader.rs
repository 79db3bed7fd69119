//! Paginated snapshot loading
//!
//! The loader fetches a manifest plus a bounded set of daily snapshot files.
//! Fetches within one batch run concurrently and are mutually independent:
//! a failed daily file is logged and dropped (that date is simply missing
//! from the matrix) while its siblings proceed. Only a manifest or
//! latest-snapshot failure is fatal to a load cycle.

use crate::config::LoaderConfig;
use crate::{PerfError, Result, Snapshot};
use async_trait::async_trait;
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

/// One manifest entry pointing at a daily snapshot file. Manifest order is
/// not assumed anywhere; the matrix builder sorts by date explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestEntry {
    pub path: String,
    pub filename: String,
    pub measurement_date: String,
}

/// The published index of available snapshot files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub files: Vec<ManifestEntry>,
}

/// Source of manifest and snapshot data. The HTTP implementation talks to
/// the published data layout; tests substitute an in-memory source.
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch_manifest(&self) -> Result<Manifest>;
    async fn fetch_latest(&self) -> Result<Snapshot>;
    async fn fetch_snapshot(&self, entry: &ManifestEntry) -> Result<Snapshot>;
}

/// HTTP snapshot source backed by `reqwest`.
pub struct HttpSource {
    client: reqwest::Client,
    config: LoaderConfig,
}

impl HttpSource {
    pub fn new(config: LoaderConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path);
        debug!(%url, "fetching");
        let value = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(value)
    }
}

#[async_trait]
impl SnapshotSource for HttpSource {
    async fn fetch_manifest(&self) -> Result<Manifest> {
        self.get_json(&self.config.manifest_path).await
    }

    async fn fetch_latest(&self) -> Result<Snapshot> {
        self.get_json(&self.config.latest_path).await
    }

    async fn fetch_snapshot(&self, entry: &ManifestEntry) -> Result<Snapshot> {
        self.get_json(&entry.path).await
    }
}

/// Result of an initial load cycle.
#[derive(Debug, Clone)]
pub struct LoadedData {
    pub manifest: Manifest,
    pub latest: Snapshot,
    /// Successfully parsed daily snapshots; failed files are absent.
    pub daily: Vec<Snapshot>,
    pub total_available: usize,
    pub currently_loaded: usize,
}

/// Drives initial, incremental, and background snapshot loading over a
/// [`SnapshotSource`].
pub struct SnapshotLoader<S> {
    source: Arc<S>,
    config: LoaderConfig,
}

// Manual impl: a clone shares the source, so `S` itself need not be `Clone`.
impl<S> Clone for SnapshotLoader<S> {
    fn clone(&self) -> Self {
        Self {
            source: Arc::clone(&self.source),
            config: self.config.clone(),
        }
    }
}

impl<S: SnapshotSource + 'static> SnapshotLoader<S> {
    pub fn new(source: S, config: LoaderConfig) -> Self {
        Self {
            source: Arc::new(source),
            config,
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Fetch the manifest, the latest snapshot, and the most recent `limit`
    /// daily files.
    ///
    /// Manifest or latest failure is fatal to this call and surfaced as an
    /// error for the caller to render as "no data". Daily files are fetched
    /// concurrently; individual failures are logged and dropped.
    pub async fn initial_load(&self, limit: usize) -> Result<LoadedData> {
        let manifest = self
            .source
            .fetch_manifest()
            .await
            .map_err(|e| PerfError::ManifestUnavailable(e.to_string()))?;
        let latest = self
            .source
            .fetch_latest()
            .await
            .map_err(|e| PerfError::LatestUnavailable(e.to_string()))?;

        let recent = &manifest.files[..limit.min(manifest.files.len())];
        let daily = self.fetch_batch(recent).await;

        Ok(LoadedData {
            total_available: manifest.files.len(),
            currently_loaded: daily.len(),
            manifest,
            latest,
            daily,
        })
    }

    /// Fetch a contiguous unfetched manifest slice. Returns successfully
    /// parsed snapshots only; an empty result past the end of the manifest.
    pub async fn load_more(
        &self,
        manifest: &Manifest,
        start_index: usize,
        batch_size: usize,
    ) -> Vec<Snapshot> {
        if start_index >= manifest.files.len() {
            return Vec::new();
        }
        let end = (start_index + batch_size).min(manifest.files.len());
        self.fetch_batch(&manifest.files[start_index..end]).await
    }

    /// Fetch one batch concurrently. One failure never aborts its siblings.
    async fn fetch_batch(&self, entries: &[ManifestEntry]) -> Vec<Snapshot> {
        let fetches = entries.iter().map(|entry| {
            let source = Arc::clone(&self.source);
            async move {
                match source.fetch_snapshot(entry).await {
                    Ok(snapshot) => Some(snapshot),
                    Err(e) => {
                        warn!(file = %entry.filename, error = %e, "dropping daily snapshot");
                        None
                    }
                }
            }
        });
        join_all(fetches).await.into_iter().flatten().collect()
    }

    /// Spawn sequential background loading of the remaining manifest.
    ///
    /// One fixed-size batch is issued per tick, with the configured delay
    /// between batches, resuming from `start_index` and stopping at
    /// manifest exhaustion. Each batch is delivered over `batches`. The
    /// task also stops when the shutdown signal flips to `true` or the
    /// receiver is dropped; either form of teardown abandons future
    /// batches without panicking.
    pub fn spawn_background_load(
        &self,
        manifest: Manifest,
        start_index: usize,
        batches: mpsc::Sender<Vec<Snapshot>>,
        mut shutdown: watch::Receiver<bool>,
    ) -> JoinHandle<()> {
        let loader = self.clone();
        let batch_size = self.config.background_batch_size;
        let delay = Duration::from_millis(self.config.background_delay_ms);

        tokio::spawn(async move {
            let mut index = start_index;
            loop {
                if *shutdown.borrow() {
                    debug!("background load shut down");
                    break;
                }
                if index >= manifest.files.len() {
                    debug!(total = manifest.files.len(), "manifest exhausted");
                    break;
                }

                let batch = tokio::select! {
                    batch = loader.load_more(&manifest, index, batch_size) => batch,
                    _ = shutdown.changed() => break,
                };
                index += batch_size;

                if batches.send(batch).await.is_err() {
                    debug!("batch receiver dropped, abandoning background load");
                    break;
                }

                tokio::select! {
                    _ = sleep(delay) => {}
                    _ = shutdown.changed() => break,
                }
            }
        })
    }
}

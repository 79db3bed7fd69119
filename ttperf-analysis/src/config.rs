//! Configuration for snapshot loading

use crate::{PerfError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings controlling where snapshots are fetched from and how load is
/// paced. The defaults match the published data layout: an `index.json`
/// manifest, a `latest_results.json` summary file, and one JSON file per
/// measurement day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Base URL the manifest and snapshot paths are resolved against
    pub base_url: String,
    /// Manifest path relative to the base URL
    pub manifest_path: String,
    /// Latest-results path relative to the base URL
    pub latest_path: String,
    /// Number of recent daily files fetched by the initial load
    pub initial_files: usize,
    /// Batch size for a user-triggered "load more"
    pub load_more_increment: usize,
    /// Batch size for automatic background loading
    pub background_batch_size: usize,
    /// Delay between background batches, in milliseconds
    pub background_delay_ms: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            manifest_path: "data/index.json".to_string(),
            latest_path: "data/latest/latest_results.json".to_string(),
            initial_files: 10,
            load_more_increment: 20,
            background_batch_size: 10,
            background_delay_ms: 1000,
        }
    }
}

impl LoaderConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| PerfError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| PerfError::Config(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

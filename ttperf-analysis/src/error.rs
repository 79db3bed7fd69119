use thiserror::Error;

/// Errors raised by the analysis pipeline.
///
/// Only manifest/latest fetch failures are fatal to a load cycle. A failed
/// daily snapshot fetch is logged and dropped by the loader and never
/// surfaces as an error; an unclassifiable operation name falls back to the
/// default category.
#[derive(Error, Debug)]
pub enum PerfError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("manifest unavailable: {0}")]
    ManifestUnavailable(String),

    #[error("latest snapshot unavailable: {0}")]
    LatestUnavailable(String),
}

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PerfError>;

//! Error types for fetching and storage

use thiserror::Error;

/// Failure of a request against the settly API
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request was superseded or torn down before it finished
    #[error("request cancelled")]
    Cancelled,

    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status
    #[error("server returned status {0}")]
    Status(u16),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid endpoint url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Configured timeout is negative, NaN, or too large
    #[error("invalid timeout: {0} seconds")]
    InvalidTimeout(f64),
}

impl FetchError {
    /// Cancellation is not a failure and must never reach the error status
    pub fn is_cancelled(&self) -> bool {
        matches!(self, FetchError::Cancelled)
    }
}

/// Failure of the persistent key-value store
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

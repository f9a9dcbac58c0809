//! Fetch error types.

/// Errors from retrieving an external schema document.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// HTTP transport error, after retries.
    #[error("HTTP error fetching {uri}: {source}")]
    Http {
        uri: String,
        source: reqwest::Error,
    },
    /// The server answered with a non-2xx status.
    #[error("{uri} returned {status}")]
    Status { uri: String, status: u16 },
    /// The body exceeds the configured size limit.
    #[error("{uri} is larger than the {limit}-byte limit")]
    TooLarge { uri: String, limit: usize },
    /// The fetch was cancelled through a [`crate::CancelHandle`].
    #[error("fetch of {uri} was cancelled")]
    Cancelled { uri: String },
    /// The private runtime could not be started.
    #[error("failed to start fetch runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] super::config::ConfigError),
}

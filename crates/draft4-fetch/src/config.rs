//! Fetcher configuration.
//!
//! Defaults are conservative: a schema that cannot be fetched within the
//! timeout fails its reference instead of stalling compilation. Override via
//! environment variables or explicit construction.

/// Limits applied to every external document fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Retries after the first attempt, on transport errors only.
    pub max_retries: u32,
    /// Largest accepted response body.
    pub max_document_bytes: usize,
    /// `User-Agent` header sent with each request.
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            max_retries: 2,
            max_document_bytes: 4 * 1024 * 1024,
            user_agent: concat!("draft4/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl FetchConfig {
    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `DRAFT4_FETCH_TIMEOUT_SECS` (default: 10)
    /// - `DRAFT4_FETCH_MAX_RETRIES` (default: 2)
    /// - `DRAFT4_FETCH_MAX_BYTES` (default: 4194304)
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a variable is set but is
    /// not a non-negative integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            timeout_secs: env_number("DRAFT4_FETCH_TIMEOUT_SECS", defaults.timeout_secs)?,
            max_retries: env_number("DRAFT4_FETCH_MAX_RETRIES", defaults.max_retries)?,
            max_document_bytes: env_number("DRAFT4_FETCH_MAX_BYTES", defaults.max_document_bytes)?,
            user_agent: defaults.user_agent,
        })
    }

    /// Short timeout and no retries, for tests against a local mock server.
    pub fn local_mock() -> Self {
        Self {
            timeout_secs: 2,
            max_retries: 0,
            ..Self::default()
        }
    }
}

fn env_number<T: std::str::FromStr>(var: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(var.to_string(), raw)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1:?}")]
    InvalidValue(String, String),
}

//! # draft4-fetch: HTTP Retrieval of External Schemas
//!
//! Implements [`draft4_schema::Retrieve`] over HTTP so that compiles with
//! external references enabled can follow absolute `$ref` URIs.
//!
//! The schema compiler is synchronous, so [`HttpFetcher`] owns a private
//! current-thread tokio runtime and blocks on each request. Every fetch is:
//!
//! - bounded by [`FetchConfig::timeout_secs`] per attempt,
//! - retried with exponential backoff on transport errors only,
//! - capped at [`FetchConfig::max_document_bytes`],
//! - abandoned as soon as its [`CancelHandle`] is triggered.
//!
//! Do not call [`HttpFetcher::fetch`] from inside an async task; run the
//! compile on a blocking thread instead.

pub mod config;
pub mod error;
pub(crate) mod retry;

pub use config::{ConfigError, FetchConfig};
pub use error::FetchError;

use std::sync::Arc;
use std::time::Duration;

use draft4_schema::{Retrieve, RetrieveError};
use tokio::runtime::Runtime;
use tokio::sync::watch;
use url::Url;

/// Blocking HTTP retriever for external schema documents.
#[derive(Debug)]
pub struct HttpFetcher {
    http: reqwest::Client,
    runtime: Runtime,
    config: FetchConfig,
    cancel_tx: Arc<watch::Sender<bool>>,
    cancelled: watch::Receiver<bool>,
}

/// Cancels every in-flight and future fetch of the [`HttpFetcher`] it came
/// from. Cloneable and usable from any thread.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    /// Abort in-flight fetches; later fetches fail immediately.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    /// Whether [`CancelHandle::cancel`] has been called.
    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl HttpFetcher {
    /// Build a fetcher from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the HTTP client cannot be built and
    /// [`FetchError::Runtime`] if the runtime cannot be started.
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Http {
                uri: "client_init".into(),
                source: e,
            })?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(FetchError::Runtime)?;
        let (cancel_tx, cancelled) = watch::channel(false);
        Ok(Self {
            http,
            runtime,
            config,
            cancel_tx: Arc::new(cancel_tx),
            cancelled,
        })
    }

    /// Build a fetcher from `DRAFT4_FETCH_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Config`] for malformed variables, otherwise as
    /// [`HttpFetcher::new`].
    pub fn from_env() -> Result<Self, FetchError> {
        Self::new(FetchConfig::from_env()?)
    }

    /// The configuration this fetcher was built with.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// A handle that cancels this fetcher's requests.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            tx: Arc::clone(&self.cancel_tx),
        }
    }

    /// Fetch the document at `uri`, blocking the current thread.
    ///
    /// # Errors
    ///
    /// See [`FetchError`].
    pub fn fetch(&self, uri: &Url) -> Result<Vec<u8>, FetchError> {
        let mut cancelled = self.cancelled.clone();
        if *cancelled.borrow() {
            return Err(FetchError::Cancelled {
                uri: uri.to_string(),
            });
        }
        self.runtime.block_on(async {
            tokio::select! {
                _ = cancelled.wait_for(|c| *c) => Err(FetchError::Cancelled { uri: uri.to_string() }),
                result = self.fetch_async(uri) => result,
            }
        })
    }

    async fn fetch_async(&self, uri: &Url) -> Result<Vec<u8>, FetchError> {
        let http_err = |source| FetchError::Http {
            uri: uri.to_string(),
            source,
        };
        let mut resp = retry::retry_send(self.config.max_retries, || {
            self.http.get(uri.clone()).send()
        })
        .await
        .map_err(http_err)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                uri: uri.to_string(),
                status: status.as_u16(),
            });
        }

        let limit = self.config.max_document_bytes;
        let too_large = || FetchError::TooLarge {
            uri: uri.to_string(),
            limit,
        };
        if resp.content_length().is_some_and(|len| len > limit as u64) {
            return Err(too_large());
        }
        let mut body = Vec::new();
        while let Some(chunk) = resp.chunk().await.map_err(http_err)? {
            if body.len() + chunk.len() > limit {
                return Err(too_large());
            }
            body.extend_from_slice(&chunk);
        }
        tracing::debug!(%uri, bytes = body.len(), "fetched external schema");
        Ok(body)
    }
}

impl Retrieve for HttpFetcher {
    fn retrieve(&self, uri: &Url) -> Result<Vec<u8>, RetrieveError> {
        self.fetch(uri).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_fetcher_fails_without_network() {
        let fetcher = HttpFetcher::new(FetchConfig::local_mock()).unwrap();
        let handle = fetcher.cancel_handle();
        assert!(!handle.is_cancelled());
        handle.cancel();
        assert!(handle.is_cancelled());
        let uri = Url::parse("http://127.0.0.1:1/schema.json").unwrap();
        assert!(matches!(fetcher.fetch(&uri), Err(FetchError::Cancelled { .. })));
    }

    #[test]
    fn closed_port_is_an_http_error() {
        let fetcher = HttpFetcher::new(FetchConfig::local_mock()).unwrap();
        let uri = Url::parse("http://127.0.0.1:1/schema.json").unwrap();
        assert!(matches!(fetcher.fetch(&uri), Err(FetchError::Http { .. })));
    }
}

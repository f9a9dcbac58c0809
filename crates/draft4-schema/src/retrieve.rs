//! # Document Retrieval
//!
//! The resolver never performs I/O itself. Absolute-URI references are
//! handed to a [`Retrieve`] implementation, which returns the raw bytes of
//! the document; the resolver decodes and compiles them.
//!
//! Two in-process retrievers live here:
//!
//! - [`LocalRetriever`]: documents preloaded in memory, keyed by URI. Used
//!   by tests and by the CLI to serve a directory of remote schemas without
//!   touching the network.
//! - [`ChainRetriever`]: tries several retrievers in order.
//!
//! The HTTP implementation lives in the `draft4-fetch` crate.

use std::collections::HashMap;
use std::path::Path;

use serde_json::Value;
use url::Url;

/// Error type returned by retrievers.
pub type RetrieveError = Box<dyn std::error::Error + Send + Sync>;

/// Source of external schema documents.
pub trait Retrieve {
    /// Return the document at `uri` (fragment already removed).
    fn retrieve(&self, uri: &Url) -> Result<Vec<u8>, RetrieveError>;
}

impl<F> Retrieve for F
where
    F: Fn(&Url) -> Result<Vec<u8>, RetrieveError>,
{
    fn retrieve(&self, uri: &Url) -> Result<Vec<u8>, RetrieveError> {
        self(uri)
    }
}

/// Retriever backed by an in-memory URI → document map.
#[derive(Debug, Default, Clone)]
pub struct LocalRetriever {
    documents: HashMap<String, Vec<u8>>,
}

impl LocalRetriever {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register raw document bytes under `uri`.
    pub fn insert_bytes(&mut self, uri: &Url, bytes: Vec<u8>) {
        self.documents.insert(key_of(uri), bytes);
    }

    /// Register a decoded document under `uri`.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if `document` cannot be encoded.
    pub fn insert_document(&mut self, uri: &Url, document: &Value) -> Result<(), serde_json::Error> {
        let bytes = serde_json::to_vec(document)?;
        self.insert_bytes(uri, bytes);
        Ok(())
    }

    /// Load every `*.json` file under `dir` (recursively), registering each
    /// at `base` joined with its path relative to `dir`.
    ///
    /// A file `dir/folder/item.json` with base `http://localhost:1234/` is
    /// served at `http://localhost:1234/folder/item.json`.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from walking or reading the directory.
    pub fn from_dir(base: &Url, dir: impl AsRef<Path>) -> std::io::Result<Self> {
        let mut registry = Self::new();
        let dir = dir.as_ref();
        registry.load_dir(base, dir, dir)?;
        tracing::debug!(
            documents = registry.len(),
            dir = %dir.display(),
            "loaded local schema registry"
        );
        Ok(registry)
    }

    fn load_dir(&mut self, base: &Url, root: &Path, dir: &Path) -> std::io::Result<()> {
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_dir() {
                self.load_dir(base, root, &path)?;
                continue;
            }
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            let Ok(relative) = path.strip_prefix(root) else {
                continue;
            };
            let relative: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            match base.join(&relative.join("/")) {
                Ok(uri) => {
                    let bytes = std::fs::read(&path)?;
                    self.insert_bytes(&uri, bytes);
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), "skipping remote document: {e}");
                }
            }
        }
        Ok(())
    }

    /// Number of registered documents.
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl Retrieve for LocalRetriever {
    fn retrieve(&self, uri: &Url) -> Result<Vec<u8>, RetrieveError> {
        self.documents
            .get(&key_of(uri))
            .cloned()
            .ok_or_else(|| format!("no local document registered for {uri}").into())
    }
}

/// Tries each retriever in turn and returns the first success.
#[derive(Default)]
pub struct ChainRetriever {
    links: Vec<Box<dyn Retrieve + Send + Sync>>,
}

impl ChainRetriever {
    /// Empty chain; every retrieval fails until a link is pushed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a retriever to the end of the chain.
    pub fn push(mut self, link: impl Retrieve + Send + Sync + 'static) -> Self {
        self.links.push(Box::new(link));
        self
    }
}

impl Retrieve for ChainRetriever {
    fn retrieve(&self, uri: &Url) -> Result<Vec<u8>, RetrieveError> {
        let mut last: RetrieveError = format!("no retriever configured for {uri}").into();
        for link in &self.links {
            match link.retrieve(uri) {
                Ok(bytes) => return Ok(bytes),
                Err(e) => last = e,
            }
        }
        Err(last)
    }
}

fn key_of(uri: &Url) -> String {
    let mut uri = uri.clone();
    uri.set_fragment(None);
    uri.into()
}

//! # Error Types
//!
//! Three failure classes exist at compile time, and only one of them is
//! fatal:
//!
//! - [`SchemaError`]: the document itself is unusable. Returned to the
//!   caller; nothing is compiled.
//! - [`KeywordDecodeError`]: one keyword has the wrong shape. The keyword is
//!   dropped and its siblings still compile.
//! - [`ReferenceError`]: a `$ref` cannot be followed. The referencing node
//!   becomes a schema that rejects every instance.
//!
//! Validation failures are not errors; see [`crate::ValidationError`].

use thiserror::Error;

/// Fatal compile failure.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The input is not JSON, or its top level is not an object.
    #[error("schema document is not a JSON object: {reason}")]
    StructuralParse {
        /// What the decoder reported.
        reason: String,
    },

    /// Reading the document failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// A single keyword whose value does not have the expected shape.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("keyword '{keyword}' dropped: {reason}")]
pub struct KeywordDecodeError {
    /// The keyword as written in the document.
    pub keyword: String,
    /// Why decoding failed.
    pub reason: String,
}

impl KeywordDecodeError {
    pub(crate) fn new(keyword: &str, reason: impl Into<String>) -> Self {
        Self {
            keyword: keyword.to_string(),
            reason: reason.into(),
        }
    }
}

/// A `$ref` that could not be resolved.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReferenceError {
    /// The pointer looks like a URI but does not parse as one.
    #[error("cannot parse reference '{pointer}': {reason}")]
    Unparsable { pointer: String, reason: String },

    /// The pointer does not address an embedded schema.
    #[error("failed to resolve {pointer}")]
    NotFound { pointer: String },

    /// The pointer is an absolute URI and external fetching is off.
    #[error("external schema {uri} referenced but external references are disabled")]
    ExternalDisabled { uri: String },

    /// Retrieving an external document failed.
    #[error("failed to fetch external schema {uri}: {reason}")]
    Fetch { uri: String, reason: String },

    /// An external document was retrieved but is not an object-shaped JSON document.
    #[error("external schema {uri} is not a JSON object: {reason}")]
    ExternalParse { uri: String, reason: String },

    /// Following the reference leads back to a node already on the chain.
    #[error("reference cycle through {pointer}")]
    Cycle { pointer: String },
}

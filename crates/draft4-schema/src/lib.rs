//! # draft4-schema: Draft-4 JSON Schema Engine
//!
//! Compiles a JSON Schema (draft-4 vocabulary) into a constraint graph,
//! resolves its `$ref` pointers, and evaluates instances against it,
//! reporting every violation.
//!
//! ```text
//! bytes ─▶ serde_json ─▶ compile ─▶ resolve ─▶ Schema ─▶ validate ─▶ Vec<ValidationError>
//! ```
//!
//! ## Compiling
//!
//! [`Schema::compile`] takes a decoded document. Only a document whose top
//! level is not an object fails ([`SchemaError`]). A keyword with a value
//! of the wrong shape is dropped on its own; unknown keywords are kept as
//! opaque containers so `$ref` can still reach schemas nested inside
//! `definitions` or vendor extensions.
//!
//! ## Resolving
//!
//! Local pointers (`#`, `#/definitions/x`, `#/properties/a`) are always
//! followed. Absolute URIs are followed only when
//! [`ResolvePolicy::allow_external`] is set and a [`Retrieve`]
//! implementation is supplied through [`CompileOptions`]. A reference that
//! cannot be followed makes its schema reject every instance and is
//! recorded in [`Schema::reference_errors`].
//!
//! ## Validating
//!
//! [`Schema::validate`] never fails: it returns the (possibly empty) list
//! of [`ValidationError`]s. A `Schema` is immutable and `Send + Sync`.
//!
//! ## Crate Policy
//!
//! - Depends only on `draft4-core` internally.
//! - No network access; external documents come through [`Retrieve`].
//! - No process-wide configuration.

mod compile;
mod constraint;
mod evaluate;
mod graph;
mod pointer;
mod resolve;

pub mod error;
pub mod keyword;
pub mod options;
pub mod retrieve;
pub mod schema;
pub mod violation;

pub use error::{KeywordDecodeError, ReferenceError, SchemaError};
pub use keyword::Keyword;
pub use options::{CompileOptions, ResolvePolicy};
pub use retrieve::{ChainRetriever, LocalRetriever, Retrieve, RetrieveError};
pub use schema::Schema;
pub use violation::ValidationError;

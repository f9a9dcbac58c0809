//! # draft4-core: Shared Primitives
//!
//! Leaf crate of the draft4 workspace. Holds the pieces that both the
//! schema compiler and the evaluator rely on:
//!
//! - [`Numeric`]: the two canonical comparable number forms (exact
//!   integer, floating) and the conversions into them.
//! - [`JsonType`]: classification of a decoded value into one of the seven
//!   draft-4 type names.
//! - [`json_equal`]: structural equality where `1` and `1.0` are equal.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `draft4-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod equality;
pub mod error;
pub mod kind;
pub mod number;

pub use equality::json_equal;
pub use error::TypeError;
pub use kind::JsonType;
pub use number::Numeric;

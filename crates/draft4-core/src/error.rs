//! # Error Types
//!
//! Errors raised by the numeric normalizer. Everything else in this crate
//! is total.

use thiserror::Error;

/// A scalar has no safe mapping into the canonical numeric forms.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TypeError {
    /// An unsigned value too large for the exact integer form.
    #[error("unsigned value {0} does not fit the exact integer form (i64)")]
    UnsignedOverflow(u64),

    /// NaN or an infinity; JSON cannot carry these.
    #[error("non-finite float {0} has no JSON representation")]
    NonFinite(f64),

    /// The decoded number is neither integral nor representable as f64.
    #[error("number {0} has no numeric mapping")]
    Unrepresentable(String),
}

//! # draft4-cli: Command-Line Driver for draft4-schema
//!
//! Library half of the `draft4` binary. Each subcommand lives in its own
//! module with a clap `Args` struct and a `run_*` handler returning the
//! process exit code.
//!
//! ## Subcommands
//!
//! - `validate`: check JSON/YAML instance files against a schema
//! - `suite`: run a JSON-Schema-Test-Suite draft-4 directory
//!
//! ## Exit Codes
//!
//! - `0`: every instance (or test) matched
//! - `1`: at least one violation (or mismatch)
//! - `2`: operational error (unreadable file, malformed schema, bad flags)
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers; handlers write to any
//!   `io::Write` so tests can capture output.
//! - Validation semantics live in `draft4-schema`; nothing here interprets
//!   keywords.

pub mod document;
pub mod resolve;
pub mod suite;
pub mod validate;

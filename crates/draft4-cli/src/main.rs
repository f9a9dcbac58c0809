//! # draft4 CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use draft4_cli::suite::{run_suite, SuiteArgs};
use draft4_cli::validate::{run_validate, ValidateArgs};

/// Draft-4 JSON Schema validator.
///
/// Compiles a schema once, resolves its `$ref`s (optionally across
/// documents) and reports every violation an instance produces.
#[derive(Parser, Debug)]
#[command(name = "draft4", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate instance files against a schema.
    Validate(ValidateArgs),

    /// Run a JSON-Schema-Test-Suite directory.
    Suite(SuiteArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // Reports go to stdout; keep diagnostics off it.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "draft4 starting");

    let result = match cli.command {
        Commands::Validate(args) => run_validate(&args),
        Commands::Suite(args) => run_suite(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn cli_parse_validate() {
        let cli = Cli::try_parse_from(["draft4", "validate", "-s", "schema.json", "a.json", "b.yaml"])
            .unwrap();
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.schema, PathBuf::from("schema.json"));
        assert_eq!(args.instances.len(), 2);
        assert!(!args.resolve.allow_external_refs);
        assert_eq!(args.resolve.remote_base.as_str(), "http://localhost:1234/");
    }

    #[test]
    fn cli_parse_validate_requires_instances() {
        assert!(Cli::try_parse_from(["draft4", "validate", "--schema", "s.json"]).is_err());
    }

    #[test]
    fn cli_parse_validate_json_format_and_external() {
        let cli = Cli::try_parse_from([
            "draft4",
            "validate",
            "--schema",
            "s.json",
            "--format",
            "json",
            "--allow-external-refs",
            "i.json",
        ])
        .unwrap();
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate");
        };
        assert_eq!(args.format, draft4_cli::resolve::OutputFormat::Json);
        assert!(args.resolve.allow_external_refs);
    }

    #[test]
    fn cli_parse_suite_with_remotes() {
        let cli = Cli::try_parse_from([
            "draft4",
            "-vv",
            "suite",
            "tests/draft4",
            "--remotes",
            "remotes",
            "--remote-base",
            "http://example.com/schemas/",
            "--include-optional",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Commands::Suite(args) = cli.command else {
            panic!("expected suite");
        };
        assert_eq!(args.dir, PathBuf::from("tests/draft4"));
        assert!(args.include_optional);
        assert_eq!(args.resolve.remotes, Some(PathBuf::from("remotes")));
        assert_eq!(args.resolve.remote_base.as_str(), "http://example.com/schemas/");
    }

    #[test]
    fn cli_parse_rejects_bad_remote_base() {
        assert!(Cli::try_parse_from(["draft4", "suite", "d", "--remote-base", "not a url"]).is_err());
    }
}

//! # Suite Subcommand
//!
//! Runs a JSON-Schema-Test-Suite style corpus. Each `*.json` file under the
//! directory holds a list of groups:
//!
//! ```json
//! [{"description": "...", "schema": {...},
//!   "tests": [{"description": "...", "data": ..., "valid": true}]}]
//! ```
//!
//! Every test whose outcome differs from `valid` is reported; the run exits
//! 1 if there is any mismatch. Remote documents for `refRemote` style tests
//! are served with `--remotes <DIR>`.
//!
//! ```bash
//! draft4 suite JSON-Schema-Test-Suite/tests/draft4 --remotes JSON-Schema-Test-Suite/remotes
//! ```

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use draft4_schema::{CompileOptions, Schema};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::resolve::{OutputFormat, ResolveArgs};

/// Arguments for the suite subcommand.
#[derive(Args, Debug)]
pub struct SuiteArgs {
    /// Directory of test files (e.g. `tests/draft4`).
    pub dir: PathBuf,

    /// Also run files under `optional/` directories.
    #[arg(long)]
    pub include_optional: bool,

    /// Output format.
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub resolve: ResolveArgs,
}

#[derive(Debug, Deserialize)]
struct TestGroup {
    description: String,
    schema: Value,
    tests: Vec<TestCase>,
}

#[derive(Debug, Deserialize)]
struct TestCase {
    description: String,
    data: Value,
    valid: bool,
}

/// A test whose outcome differed from the expectation.
#[derive(Debug, Serialize)]
pub struct Mismatch {
    pub file: String,
    pub group: String,
    pub test: String,
    pub expected_valid: bool,
    /// Violations reported (empty when the instance was wrongly accepted),
    /// or the compile error when the schema itself was rejected.
    pub details: Vec<String>,
}

/// Totals for a suite run.
#[derive(Debug, Default, Serialize)]
pub struct SuiteReport {
    pub passed: usize,
    pub failed: usize,
    pub mismatches: Vec<Mismatch>,
}

/// Execute the suite subcommand, printing to stdout.
pub fn run_suite(args: &SuiteArgs) -> Result<u8> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    suite_to(args, &mut out)
}

/// Execute the suite subcommand, printing to `out`.
pub fn suite_to(args: &SuiteArgs, out: &mut impl Write) -> Result<u8> {
    let retriever = args.resolve.retriever()?;
    let options = args.resolve.options(retriever.as_ref());

    let mut files = Vec::new();
    collect_files(&args.dir, args.include_optional, &mut files)
        .with_context(|| format!("failed to walk {}", args.dir.display()))?;
    files.sort();
    tracing::info!(files = files.len(), dir = %args.dir.display(), "running test suite");

    let mut report = SuiteReport::default();
    for path in &files {
        run_file(path, &args.dir, &options, &mut report)?;
    }

    match args.format {
        OutputFormat::Text => {
            for m in &report.mismatches {
                let expected = if m.expected_valid { "valid" } else { "invalid" };
                writeln!(out, "FAIL {} :: {} :: {} (expected {expected})", m.file, m.group, m.test)?;
                for detail in &m.details {
                    writeln!(out, "    {detail}")?;
                }
            }
            writeln!(out, "{} passed, {} failed", report.passed, report.failed)?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
    }
    Ok(u8::from(report.failed > 0))
}

fn run_file(
    path: &Path,
    root: &Path,
    options: &CompileOptions<'_>,
    report: &mut SuiteReport,
) -> Result<()> {
    let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    let groups: Vec<TestGroup> = serde_json::from_slice(&bytes)
        .with_context(|| format!("{} is not a test-suite file", path.display()))?;
    let file = path.strip_prefix(root).unwrap_or(path).display().to_string();

    for group in groups {
        let schema = Schema::compile_with(&group.schema, options);
        for case in group.tests {
            let (passed, details) = match &schema {
                Ok(schema) => {
                    let errors = schema.validate(&case.data);
                    let passed = errors.is_empty() == case.valid;
                    (passed, errors.iter().map(ToString::to_string).collect())
                }
                Err(e) => (false, vec![e.to_string()]),
            };
            if passed {
                report.passed += 1;
            } else {
                report.failed += 1;
                report.mismatches.push(Mismatch {
                    file: file.clone(),
                    group: group.description.clone(),
                    test: case.description,
                    expected_valid: case.valid,
                    details,
                });
            }
        }
    }
    Ok(())
}

fn collect_files(dir: &Path, include_optional: bool, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            if include_optional || path.file_name().is_some_and(|n| n != "optional") {
                collect_files(&path, include_optional, files)?;
            }
        } else if path.extension().is_some_and(|e| e == "json") {
            files.push(path);
        }
    }
    Ok(())
}

//! # Validate Subcommand
//!
//! Checks one or more instance files (JSON or YAML) against a schema.
//!
//! ```bash
//! draft4 validate --schema person.schema.json alice.json bob.yaml
//! draft4 validate --schema api.json --allow-external-refs --format json payload.json
//! ```
//!
//! Exit status is 0 when every instance is valid and 1 otherwise. Files
//! that cannot be read or parsed are operational errors.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use draft4_schema::{Schema, ValidationError};
use serde::Serialize;

use crate::document::load_document;
use crate::resolve::{OutputFormat, ResolveArgs};

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schema document (JSON or YAML).
    #[arg(long, short)]
    pub schema: PathBuf,

    /// Instance documents to check.
    #[arg(required = true)]
    pub instances: Vec<PathBuf>,

    /// Output format.
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,

    #[command(flatten)]
    pub resolve: ResolveArgs,
}

/// Outcome for one instance file.
#[derive(Debug, Serialize)]
pub struct InstanceReport {
    pub instance: String,
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    schema: String,
    reference_errors: Vec<String>,
    instances: &'a [InstanceReport],
}

/// Execute the validate subcommand, printing to stdout.
pub fn run_validate(args: &ValidateArgs) -> Result<u8> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    validate_to(args, &mut out)
}

/// Execute the validate subcommand, printing to `out`.
pub fn validate_to(args: &ValidateArgs, out: &mut impl Write) -> Result<u8> {
    let schema = compile_schema(&args.schema, &args.resolve)?;
    let reference_errors: Vec<String> = schema
        .reference_errors()
        .iter()
        .map(ToString::to_string)
        .collect();

    let mut reports = Vec::with_capacity(args.instances.len());
    for path in &args.instances {
        let instance = load_document(path)?;
        let errors = schema.validate(&instance);
        reports.push(InstanceReport {
            instance: path.display().to_string(),
            valid: errors.is_empty(),
            errors,
        });
    }

    match args.format {
        OutputFormat::Text => {
            for err in &reference_errors {
                writeln!(out, "warning: {err}")?;
            }
            for report in &reports {
                if report.valid {
                    writeln!(out, "{}: valid", report.instance)?;
                } else {
                    writeln!(out, "{}: {} violation(s)", report.instance, report.errors.len())?;
                    for err in &report.errors {
                        writeln!(out, "  {err}")?;
                    }
                }
            }
        }
        OutputFormat::Json => {
            let report = Report {
                schema: args.schema.display().to_string(),
                reference_errors,
                instances: &reports,
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
    }

    let invalid = reports.iter().filter(|r| !r.valid).count();
    tracing::info!(instances = reports.len(), invalid, "validation complete");
    Ok(u8::from(invalid > 0))
}

/// Load and compile a schema file under the given resolution flags.
pub fn compile_schema(path: &Path, resolve: &ResolveArgs) -> Result<Schema> {
    let document = load_document(path)?;
    let retriever = resolve.retriever()?;
    let options = resolve.options(retriever.as_ref());
    Schema::compile_with(&document, &options)
        .with_context(|| format!("failed to compile schema {}", path.display()))
}

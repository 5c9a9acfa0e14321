//! # Validate Subcommand
//!
//! Runs structural and business validation over a schedule file and prints
//! the full report, including statistics and every warning. Intended for
//! build logs, where the strict `check` is too terse.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use confsite_schema::{generate_validation_report, load_schedule};

use crate::CliContext;

/// Arguments for the `confsite validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Schedule JSON file to validate.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Label printed in the report header. Defaults to the file name.
    #[arg(long)]
    pub context: Option<String>,

    /// Directory of `*.schema.json` files for the JSON Schema cross-check.
    #[arg(long)]
    pub schema_dir: Option<PathBuf>,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when valid, 1 when the report has errors, 2 when the
/// file cannot be loaded.
pub fn run_validate(args: &ValidateArgs, ctx: &CliContext) -> Result<u8> {
    let schema = ctx.schema_validator(args.schema_dir.as_deref())?;

    let doc = match load_schedule(&args.file) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::error!("{e}");
            return Ok(2);
        }
    };

    let context = args.context.clone().unwrap_or_else(|| {
        args.file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| args.file.display().to_string())
    });

    let report = generate_validation_report(&doc, &context, &ctx.config, schema.as_ref());
    print!("{report}");

    tracing::info!(
        errors = report.result.error_count(),
        warnings = report.result.warning_count(),
        "validation finished"
    );

    Ok(if report.is_valid() { 0 } else { 1 })
}

//! # Normalize Subcommand
//!
//! Prints the render-ready form of a schedule to stdout. Anything the
//! normalizer had to fix or skip is logged as a warning on stderr, so the
//! output can be piped straight into a file.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use confsite_schema::{load_schedule, normalize_schedule};

/// Arguments for the `confsite normalize` subcommand.
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Schedule JSON file to normalize.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Print compact JSON instead of pretty-printed.
    #[arg(long)]
    pub compact: bool,
}

/// Execute the normalize subcommand.
pub fn run_normalize(args: &NormalizeArgs) -> Result<u8> {
    let doc = load_schedule(&args.file)?;
    let normalized = normalize_schedule(&doc);

    for diagnostic in &normalized.diagnostics {
        tracing::warn!(stage = ?diagnostic.stage, "{diagnostic}");
    }

    let output = if args.compact {
        serde_json::to_string(&normalized.document)
    } else {
        serde_json::to_string_pretty(&normalized.document)
    }
    .context("failed to serialize normalized schedule")?;
    println!("{output}");
    Ok(0)
}

//! # Check Subcommand
//!
//! The strict gate run before a site build. A schedule passes when it
//! loads, has non-empty `days` and `categories`, a `sessions` object, and no
//! structural validation errors. Warnings are logged but do not fail.
//!
//! Failures print `Error: <message>` to stderr and exit 1. That includes a
//! site configuration that failed to load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::Args;

use confsite_schema::{
    check_site_schedule, load_schedule, validate_bilingual_schedule, SchemaValidator, SiteSummary,
};

use crate::CliContext;

/// Arguments for the `confsite check` subcommand.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Schedule JSON file to check.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Directory of `*.schema.json` files for the JSON Schema cross-check.
    #[arg(long)]
    pub schema_dir: Option<PathBuf>,
}

/// Execute the check subcommand against the loaded site context.
pub fn run_check(args: &CheckArgs, ctx: Result<CliContext>) -> u8 {
    let outcome = ctx
        .and_then(|ctx| ctx.schema_validator(args.schema_dir.as_deref()))
        .and_then(|schema| check_file(&args.file, schema.as_ref()));
    match outcome {
        Ok(summary) => {
            print!("{}", render_summary(&args.file, &summary));
            0
        }
        Err(e) => {
            eprintln!("Error: {e:#}");
            1
        }
    }
}

fn check_file(path: &Path, schema: Option<&SchemaValidator>) -> Result<SiteSummary> {
    let doc = load_schedule(path)?;
    let summary = check_site_schedule(&doc)?;

    let result = validate_bilingual_schedule(&doc, schema);
    for warning in &result.warnings {
        tracing::warn!("{warning}");
    }
    if !result.is_valid() {
        bail!(
            "schedule failed validation with {} error(s):\n{}",
            result.error_count(),
            result.error_text()
        );
    }
    Ok(summary)
}

/// Text printed for a schedule that passed.
pub fn render_summary(path: &Path, summary: &SiteSummary) -> String {
    format!(
        "OK: {}\n  Days:               {}\n  Categories:         {}\n  Session categories: {}\n  Sessions:           {}\n",
        path.display(),
        summary.days,
        summary.categories,
        summary.session_categories,
        summary.sessions,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use confsite_core::SiteConfig;

    fn ctx() -> CliContext {
        CliContext {
            config: SiteConfig::default(),
            base_dir: PathBuf::from("."),
        }
    }

    fn run_on(content: &str) -> u8 {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("schedule.json");
        std::fs::write(&file, content).unwrap();
        run_check(&CheckArgs { file, schema_dir: None }, Ok(ctx()))
    }

    #[test]
    fn test_empty_schedule_fails_strict_check() {
        assert_eq!(run_on(r#"{"days": [], "categories": [], "sessions": {}}"#), 1);
    }

    #[test]
    fn test_invalid_json_fails() {
        assert_eq!(run_on("{"), 1);
    }

    #[test]
    fn test_missing_file_fails() {
        let args = CheckArgs {
            file: PathBuf::from("/nonexistent/schedule.json"),
            schema_dir: None,
        };
        assert_eq!(run_check(&args, Ok(ctx())), 1);
    }

    #[test]
    fn test_bad_site_config_fails() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("schedule.json");
        std::fs::write(
            &file,
            r#"{"days": [{"date": "d", "title": "t", "url": "/d"}], "categories": [{"id": "a", "name": "A", "room": "R"}], "sessions": {"a": []}}"#,
        )
        .unwrap();
        std::fs::write(dir.path().join("confsite.yaml"), "default_language: fr\n").unwrap();

        let ctx = CliContext::load(None, dir.path());
        assert!(ctx.is_err());
        assert_eq!(run_check(&CheckArgs { file, schema_dir: None }, ctx), 1);
    }

    #[test]
    fn test_structural_errors_fail() {
        let code = run_on(
            r#"{"days": [{"date": "d", "title": "t"}], "categories": [{"id": "a", "name": "A", "room": "R"}], "sessions": {}}"#,
        );
        assert_eq!(code, 1);
    }

    #[test]
    fn test_minimal_schedule_passes() {
        let code = run_on(
            r#"{"days": [{"date": "d", "title": "t", "url": "/d"}], "categories": [{"id": "a", "name": "A", "room": "R"}], "sessions": {"a": []}}"#,
        );
        assert_eq!(code, 0);
    }

    #[test]
    fn test_render_summary() {
        let text = render_summary(
            Path::new("s.json"),
            &SiteSummary {
                days: 2,
                categories: 3,
                session_categories: 3,
                sessions: 4,
            },
        );
        assert!(text.starts_with("OK: s.json\n"));
        assert!(text.contains("  Sessions:           4\n"));
    }
}

//! # Validation Report
//!
//! Runs structural and business validation over a document, computes
//! summary statistics, and renders a fixed-layout text report for build
//! logs. The layout is for humans; it is not a stable machine format.
//!
//! Section order: header, SUMMARY, STATISTICS, ERRORS, WARNINGS, and a
//! success line when there is nothing to report.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use confsite_core::SiteConfig;
use serde::Serialize;
use serde_json::Value;

use crate::business::validate_business_rules;
use crate::diagnostic::{Diagnostic, ValidationResult};
use crate::schema::SchemaValidator;
use crate::structural::validate_bilingual_schedule;

const RULE: &str = "============================================================";

/// Counts over a schedule document. Malformed parts count as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScheduleStats {
    /// Entries in `days`.
    pub days: usize,
    /// Entries in `categories`.
    pub categories: usize,
    /// Keys in `sessions`.
    pub session_categories: usize,
    /// Sessions across all buckets.
    pub sessions: usize,
    /// Speaker entries across all sessions.
    pub speaker_slots: usize,
    /// Distinct speaker ids across all sessions.
    pub unique_speakers: usize,
}

fn array_len(doc: &Value, key: &str) -> usize {
    doc.get(key).and_then(Value::as_array).map_or(0, Vec::len)
}

/// Compute statistics for `doc`.
pub fn schedule_stats(doc: &Value) -> ScheduleStats {
    let buckets = doc.get("sessions").and_then(Value::as_object);
    let sessions: Vec<&Value> = buckets
        .into_iter()
        .flat_map(|b| b.values())
        .filter_map(Value::as_array)
        .flatten()
        .collect();
    let speakers: Vec<&Value> = sessions
        .iter()
        .filter_map(|s| s.get("speakers").and_then(Value::as_array))
        .flatten()
        .collect();
    let unique: HashSet<&str> = speakers
        .iter()
        .filter_map(|s| s.get("id").and_then(Value::as_str))
        .collect();

    ScheduleStats {
        days: array_len(doc, "days"),
        categories: array_len(doc, "categories"),
        session_categories: buckets.map_or(0, |b| b.len()),
        sessions: sessions.len(),
        speaker_slots: speakers.len(),
        unique_speakers: unique.len(),
    }
}

/// A finished validation run, ready to render.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// Label of what was validated, e.g. a file name or build step.
    pub context: String,
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
    /// Structural and business diagnostics, in that order.
    pub result: ValidationResult,
    /// Document statistics.
    pub stats: ScheduleStats,
}

impl ValidationReport {
    /// True iff there are no errors.
    pub fn is_valid(&self) -> bool {
        self.result.is_valid()
    }

    /// Render the report as text.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

fn write_enumerated(f: &mut fmt::Formatter<'_>, title: &str, items: &[Diagnostic]) -> fmt::Result {
    if items.is_empty() {
        return Ok(());
    }
    writeln!(f)?;
    writeln!(f, "{title} ({})", items.len())?;
    for (i, item) in items.iter().enumerate() {
        writeln!(f, "  {}. {item}", i + 1)?;
    }
    Ok(())
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.is_valid() { "VALID" } else { "INVALID" };

        writeln!(f, "{RULE}")?;
        writeln!(f, "SCHEDULE VALIDATION REPORT")?;
        writeln!(f, "Context:   {}", self.context)?;
        writeln!(
            f,
            "Generated: {}",
            self.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        )?;
        writeln!(f, "{RULE}")?;

        writeln!(f)?;
        writeln!(f, "SUMMARY")?;
        writeln!(f, "  Status:   {status}")?;
        writeln!(f, "  Errors:   {}", self.result.error_count())?;
        writeln!(f, "  Warnings: {}", self.result.warning_count())?;

        writeln!(f)?;
        writeln!(f, "STATISTICS")?;
        writeln!(f, "  Days:               {}", self.stats.days)?;
        writeln!(f, "  Categories:         {}", self.stats.categories)?;
        writeln!(f, "  Session categories: {}", self.stats.session_categories)?;
        writeln!(f, "  Sessions:           {}", self.stats.sessions)?;
        writeln!(f, "  Speaker slots:      {}", self.stats.speaker_slots)?;
        writeln!(f, "  Unique speakers:    {}", self.stats.unique_speakers)?;

        write_enumerated(f, "ERRORS", &self.result.errors)?;
        write_enumerated(f, "WARNINGS", &self.result.warnings)?;

        if self.result.error_count() == 0 && self.result.warning_count() == 0 {
            writeln!(f)?;
            writeln!(f, "All checks passed: no errors or warnings.")?;
        }
        Ok(())
    }
}

/// Validate `doc` and build a report stamped with the current time.
pub fn generate_validation_report(
    doc: &Value,
    context: &str,
    config: &SiteConfig,
    schema: Option<&SchemaValidator>,
) -> ValidationReport {
    build_report_at(doc, context, config, schema, Utc::now())
}

/// Validate `doc` and build a report stamped with `generated_at`.
pub fn build_report_at(
    doc: &Value,
    context: &str,
    config: &SiteConfig,
    schema: Option<&SchemaValidator>,
    generated_at: DateTime<Utc>,
) -> ValidationReport {
    let result = validate_bilingual_schedule(doc, schema).merge(validate_business_rules(doc, config));
    ValidationReport {
        context: context.to_string(),
        generated_at,
        result,
        stats: schedule_stats(doc),
    }
}

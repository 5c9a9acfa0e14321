//! # Diagnostics and Validation Results
//!
//! Every validator in this crate returns a [`ValidationResult`] by value.
//! Parents fold their children's results with [`ValidationResult::merge`]
//! (or `collect()`), so no validator mutates shared state.

use std::fmt;

use confsite_core::ContextPath;
use serde::Serialize;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Makes the document invalid.
    Error,
    /// Reported, never blocks processing.
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// A single finding about a schedule document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Field the finding is about, e.g. `title` or `scheduleData.sessions`.
    pub field: String,
    /// Human-readable description.
    pub message: String,
    /// Error or warning.
    pub severity: Severity,
    /// Location of the containing entity, e.g. `sessions.talks[2].speakers[0]`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl Diagnostic {
    /// An error at `path`.
    pub fn error(field: impl Into<String>, message: impl Into<String>, path: &ContextPath) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: Severity::Error,
            context: path.to_context(),
        }
    }

    /// A warning at `path`.
    pub fn warning(
        field: impl Into<String>,
        message: impl Into<String>,
        path: &ContextPath,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            severity: Severity::Warning,
            context: path.to_context(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.field, self.message)?;
        if let Some(context) = &self.context {
            write!(f, " (at {context})")?;
        }
        Ok(())
    }
}

/// Errors and warnings produced by a validation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationResult {
    /// Findings that make the document invalid.
    pub errors: Vec<Diagnostic>,
    /// Findings that are reported but tolerated.
    pub warnings: Vec<Diagnostic>,
}

impl ValidationResult {
    /// An empty, valid result.
    pub fn new() -> Self {
        Self::default()
    }

    /// A result holding one diagnostic.
    pub fn single(diagnostic: Diagnostic) -> Self {
        Self::new().with(diagnostic)
    }

    /// True iff there are no errors. Warnings never affect validity.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add a diagnostic to the bucket matching its severity.
    pub fn with(mut self, diagnostic: Diagnostic) -> Self {
        match diagnostic.severity {
            Severity::Error => self.errors.push(diagnostic),
            Severity::Warning => self.warnings.push(diagnostic),
        }
        self
    }

    /// Concatenate another result after this one.
    pub fn merge(mut self, other: ValidationResult) -> Self {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self
    }

    /// Number of errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Number of warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// All diagnostics, errors first.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.errors.iter().chain(self.warnings.iter())
    }

    /// Errors formatted one per line, as used in load failures.
    pub fn error_text(&self) -> String {
        self.errors
            .iter()
            .map(|e| format!("  {e}"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl FromIterator<ValidationResult> for ValidationResult {
    fn from_iter<I: IntoIterator<Item = ValidationResult>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::merge)
    }
}

impl FromIterator<Diagnostic> for ValidationResult {
    fn from_iter<I: IntoIterator<Item = Diagnostic>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::with)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> ContextPath {
        ContextPath::root().key("days").index(1)
    }

    #[test]
    fn test_warnings_do_not_affect_validity() {
        let result = ValidationResult::single(Diagnostic::warning("title", "only en", &ctx()));
        assert!(result.is_valid());
        assert_eq!(result.warning_count(), 1);
    }

    #[test]
    fn test_error_invalidates() {
        let result = ValidationResult::new().with(Diagnostic::error("url", "required", &ctx()));
        assert!(!result.is_valid());
    }

    #[test]
    fn test_merge_preserves_order() {
        let a = ValidationResult::single(Diagnostic::error("a", "first", &ctx()));
        let b = ValidationResult::single(Diagnostic::error("b", "second", &ctx()));
        let merged: ValidationResult = vec![a, b].into_iter().collect();
        let fields: Vec<&str> = merged.errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["a", "b"]);
    }

    #[test]
    fn test_collect_diagnostics_sorts_by_severity() {
        let result: ValidationResult = vec![
            Diagnostic::warning("w", "w", &ctx()),
            Diagnostic::error("e", "e", &ctx()),
        ]
        .into_iter()
        .collect();
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.warning_count(), 1);
        assert_eq!(result.diagnostics().next().map(|d| d.field.as_str()), Some("e"));
    }

    #[test]
    fn test_display_includes_context() {
        let d = Diagnostic::error("url", "url is required", &ctx());
        assert_eq!(d.to_string(), "[url] url is required (at days[1])");
        let root = Diagnostic::error("scheduleData", "bad", &ContextPath::root());
        assert_eq!(root.to_string(), "[scheduleData] bad");
    }
}

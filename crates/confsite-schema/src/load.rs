//! # Document Loading
//!
//! Reads schedule documents from disk and, for callers that want a single
//! entry point, validates them in the same step. Read and parse failures are
//! errors carrying the file path; a document with validation errors becomes
//! [`ScheduleLoadError::ValidationFailed`] only through [`load_and_validate`].

use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::diagnostic::ValidationResult;
use crate::schema::SchemaValidator;
use crate::structural::validate_bilingual_schedule;

/// Errors from loading a schedule document.
#[derive(Error, Debug)]
pub enum ScheduleLoadError {
    /// The file could not be read.
    #[error("failed to read schedule {}: {reason}", .path.display())]
    DocumentRead {
        /// Path to the document.
        path: PathBuf,
        /// Underlying IO message.
        reason: String,
    },

    /// The file is not valid JSON.
    #[error("failed to parse schedule {}: {reason}", .path.display())]
    InvalidJson {
        /// Path to the document.
        path: PathBuf,
        /// Underlying parser message.
        reason: String,
    },

    /// The document parsed but has validation errors.
    #[error("schedule {} failed validation:\n{details}", .path.display())]
    ValidationFailed {
        /// Path to the document.
        path: PathBuf,
        /// One error per line.
        details: String,
    },
}

/// A document that passed structural validation, with any warnings.
#[derive(Debug, Clone)]
pub struct ValidatedSchedule {
    /// The parsed document.
    pub document: Value,
    /// The validation outcome; always free of errors.
    pub result: ValidationResult,
}

/// Read and parse a JSON document.
pub fn load_schedule(path: &Path) -> Result<Value, ScheduleLoadError> {
    let content = std::fs::read_to_string(path).map_err(|e| ScheduleLoadError::DocumentRead {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let doc = serde_json::from_str(&content).map_err(|e| ScheduleLoadError::InvalidJson {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    tracing::debug!(path = %path.display(), "loaded schedule document");
    Ok(doc)
}

/// Load `path` and run structural validation (plus the schema cross-check
/// when `schema` is given).
///
/// # Errors
///
/// Read and parse failures as in [`load_schedule`];
/// [`ScheduleLoadError::ValidationFailed`] when validation reports errors.
pub fn load_and_validate(
    path: &Path,
    schema: Option<&SchemaValidator>,
) -> Result<ValidatedSchedule, ScheduleLoadError> {
    let document = load_schedule(path)?;
    let result = validate_bilingual_schedule(&document, schema);
    if !result.is_valid() {
        return Err(ScheduleLoadError::ValidationFailed {
            path: path.to_path_buf(),
            details: result.error_text(),
        });
    }
    for warning in &result.warnings {
        tracing::warn!(path = %path.display(), "{warning}");
    }
    Ok(ValidatedSchedule { document, result })
}

//! # Strict Site Check
//!
//! The gate used before a site build. Stricter than structural validation:
//! `days` and `categories` must be non-empty, so an all-empty schedule that
//! the library validator accepts is rejected here.

use confsite_core::text::json_kind;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// Why a document failed the site check.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SiteCheckError {
    /// The document is not a JSON object.
    #[error("schedule data must be an object, found {found}")]
    NotAnObject {
        /// JSON kind of the document.
        found: &'static str,
    },

    /// A top-level field is absent.
    #[error("schedule data is missing required field '{field}'")]
    MissingField {
        /// The absent field.
        field: &'static str,
    },

    /// A top-level field has the wrong type.
    #[error("'{field}' must be {expected}, found {found}")]
    WrongType {
        /// The offending field.
        field: &'static str,
        /// Expected JSON kind.
        expected: &'static str,
        /// Actual JSON kind.
        found: &'static str,
    },

    /// `days` or `categories` is an empty array.
    #[error("'{field}' must not be empty")]
    Empty {
        /// The empty field.
        field: &'static str,
    },
}

/// Counts printed after a successful check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SiteSummary {
    /// Entries in `days`.
    pub days: usize,
    /// Entries in `categories`.
    pub categories: usize,
    /// Keys in `sessions`.
    pub session_categories: usize,
    /// Sessions across all array-valued buckets.
    pub sessions: usize,
}

fn required<'a>(doc: &'a serde_json::Map<String, Value>, field: &'static str) -> Result<&'a Value, SiteCheckError> {
    doc.get(field).ok_or(SiteCheckError::MissingField { field })
}

fn non_empty_array<'a>(value: &'a Value, field: &'static str) -> Result<&'a Vec<Value>, SiteCheckError> {
    let items = value.as_array().ok_or(SiteCheckError::WrongType {
        field,
        expected: "an array",
        found: json_kind(value),
    })?;
    if items.is_empty() {
        return Err(SiteCheckError::Empty { field });
    }
    Ok(items)
}

/// Check that `doc` is fit for a site build.
pub fn check_site_schedule(doc: &Value) -> Result<SiteSummary, SiteCheckError> {
    let map = doc.as_object().ok_or(SiteCheckError::NotAnObject {
        found: json_kind(doc),
    })?;

    let days = required(map, "days")?;
    let categories = required(map, "categories")?;
    let sessions = required(map, "sessions")?;

    let days = non_empty_array(days, "days")?;
    let categories = non_empty_array(categories, "categories")?;
    let buckets = sessions.as_object().ok_or(SiteCheckError::WrongType {
        field: "sessions",
        expected: "an object",
        found: json_kind(sessions),
    })?;

    Ok(SiteSummary {
        days: days.len(),
        categories: categories.len(),
        session_categories: buckets.len(),
        sessions: buckets.values().filter_map(Value::as_array).map(Vec::len).sum(),
    })
}

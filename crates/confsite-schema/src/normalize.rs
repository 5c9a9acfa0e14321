//! # Safe Normalization
//!
//! Produces a render-ready copy of a schedule document even when the input
//! is malformed. Every substitution or skipped entity is returned as a
//! [`ProcessingDiagnostic`]; nothing here fails.
//!
//! ## Rules
//!
//! - Structural validation runs first; its findings are forwarded as
//!   diagnostics (message and context only).
//! - Each day's `url` becomes an `{en, zh}` pair, each side filled from the
//!   other when missing.
//! - Categories are copied unchanged.
//! - Speaker `name` and `roleOrg` plain strings become `{en: s, zh: s}`.
//! - An entity that cannot be processed is kept as it was, with a
//!   diagnostic naming it; its siblings are still processed.
//!
//! Normalizing an already-normalized document produces no diagnostic that
//! the first pass did not.

use std::fmt;

use confsite_core::text::json_kind;
use confsite_core::{get_text, ContextPath, Language, TextValue};
use serde::Serialize;
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::structural::validate_schedule_structure;

/// Which part of the pass produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStage {
    /// The document as a whole.
    Document,
    /// Forwarded from structural validation.
    Validation,
    /// A day entry.
    Day,
    /// A session entry or a session bucket.
    Session,
    /// A speaker entry.
    Speaker,
}

/// A finding from the normalization pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ProcessingDiagnostic {
    /// Which part of the pass produced it.
    pub stage: ProcessingStage,
    /// Human-readable description.
    pub message: String,
    /// Location within the document, when known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl ProcessingDiagnostic {
    fn new(stage: ProcessingStage, message: String, path: &ContextPath) -> Self {
        Self {
            stage,
            message,
            context: path.to_context(),
        }
    }
}

impl fmt::Display for ProcessingDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(context) => write!(f, "{} (at {context})", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// A normalized document and the diagnostics produced on the way.
#[derive(Debug, Clone)]
pub struct Normalized {
    /// The render-ready document.
    pub document: Value,
    /// Diagnostics in traversal order.
    pub diagnostics: Vec<ProcessingDiagnostic>,
}

#[derive(Error, Debug)]
enum EntityError {
    #[error("expected an object, found {0}")]
    NotAnObject(&'static str),

    #[error("expected an array, found {0}")]
    NotAnArray(&'static str),

    #[error("{field} must be a string or an {{en, zh}} object, found {found}")]
    BadText {
        field: &'static str,
        found: &'static str,
    },
}

/// Normalize `doc` for rendering.
pub fn normalize_schedule(doc: &Value) -> Normalized {
    let root = ContextPath::root();
    let Some(map) = doc.as_object() else {
        return Normalized {
            document: doc.clone(),
            diagnostics: vec![ProcessingDiagnostic::new(
                ProcessingStage::Document,
                format!(
                    "Failed to process schedule data: {}",
                    EntityError::NotAnObject(json_kind(doc))
                ),
                &root,
            )],
        };
    };

    let mut diagnostics: Vec<ProcessingDiagnostic> = validate_schedule_structure(doc)
        .diagnostics()
        .map(|d| ProcessingDiagnostic {
            stage: ProcessingStage::Validation,
            message: d.message.clone(),
            context: d.context.clone(),
        })
        .collect();

    let mut out = map.clone();

    match map.get("days") {
        Some(Value::Array(days)) => {
            let days_path = root.key("days");
            let days = days
                .iter()
                .enumerate()
                .map(|(i, day)| {
                    normalize_day(day).unwrap_or_else(|e| {
                        diagnostics.push(ProcessingDiagnostic::new(
                            ProcessingStage::Day,
                            format!("Failed to process day {i}: {e}"),
                            &days_path.index(i),
                        ));
                        day.clone()
                    })
                })
                .collect();
            out.insert("days".to_string(), Value::Array(days));
        }
        other => diagnostics.push(ProcessingDiagnostic::new(
            ProcessingStage::Document,
            format!(
                "Days left as-is: {}",
                EntityError::NotAnArray(other.map(json_kind).unwrap_or("missing"))
            ),
            &root,
        )),
    }

    // Categories pass through unchanged; `out` already holds a copy.

    match map.get("sessions") {
        Some(Value::Object(buckets)) => {
            let normalized = normalize_buckets(buckets, &mut diagnostics);
            out.insert("sessions".to_string(), Value::Object(normalized));
        }
        other => diagnostics.push(ProcessingDiagnostic::new(
            ProcessingStage::Document,
            format!(
                "Sessions left as-is: {}",
                EntityError::NotAnObject(other.map(json_kind).unwrap_or("missing"))
            ),
            &root,
        )),
    }

    tracing::debug!(
        diagnostics = diagnostics.len(),
        "schedule normalization finished"
    );

    Normalized {
        document: Value::Object(out),
        diagnostics,
    }
}

fn normalize_day(day: &Value) -> Result<Value, EntityError> {
    let mut out = day
        .as_object()
        .cloned()
        .ok_or(EntityError::NotAnObject(json_kind(day)))?;
    let url = TextValue::field(day, "url");
    if let TextValue::Malformed(found) = url {
        return Err(EntityError::BadText { field: "url", found });
    }
    out.insert(
        "url".to_string(),
        json!({
            "en": get_text(&url, Language::En, ""),
            "zh": get_text(&url, Language::Zh, ""),
        }),
    );
    Ok(Value::Object(out))
}

fn normalize_buckets(
    buckets: &Map<String, Value>,
    diagnostics: &mut Vec<ProcessingDiagnostic>,
) -> Map<String, Value> {
    let sessions_path = ContextPath::root().key("sessions");
    let mut out = Map::new();
    for (key, bucket) in buckets {
        let bucket_path = sessions_path.key(key);
        let normalized = match bucket {
            Value::Array(sessions) => Value::Array(
                sessions
                    .iter()
                    .enumerate()
                    .map(|(i, session)| {
                        let path = bucket_path.index(i);
                        normalize_session(session, key, i, &path, diagnostics).unwrap_or_else(|e| {
                            diagnostics.push(ProcessingDiagnostic::new(
                                ProcessingStage::Session,
                                format!("Failed to process session {i} in category \"{key}\": {e}"),
                                &path,
                            ));
                            session.clone()
                        })
                    })
                    .collect(),
            ),
            other => {
                diagnostics.push(ProcessingDiagnostic::new(
                    ProcessingStage::Session,
                    format!(
                        "Failed to process sessions for category \"{key}\": {}",
                        EntityError::NotAnArray(json_kind(other))
                    ),
                    &bucket_path,
                ));
                other.clone()
            }
        };
        out.insert(key.clone(), normalized);
    }
    out
}

fn normalize_session(
    session: &Value,
    key: &str,
    index: usize,
    path: &ContextPath,
    diagnostics: &mut Vec<ProcessingDiagnostic>,
) -> Result<Value, EntityError> {
    let mut out = session
        .as_object()
        .cloned()
        .ok_or(EntityError::NotAnObject(json_kind(session)))?;

    if let Some(Value::Array(speakers)) = session.get("speakers") {
        let speakers_path = path.key("speakers");
        let speakers = speakers
            .iter()
            .enumerate()
            .map(|(j, speaker)| {
                normalize_speaker(speaker).unwrap_or_else(|e| {
                    diagnostics.push(ProcessingDiagnostic::new(
                        ProcessingStage::Speaker,
                        format!(
                            "Failed to process speaker {j} of session {index} in category \"{key}\": {e}"
                        ),
                        &speakers_path.index(j),
                    ));
                    speaker.clone()
                })
            })
            .collect();
        out.insert("speakers".to_string(), Value::Array(speakers));
    }

    Ok(Value::Object(out))
}

fn normalize_speaker(speaker: &Value) -> Result<Value, EntityError> {
    let mut out = speaker
        .as_object()
        .cloned()
        .ok_or(EntityError::NotAnObject(json_kind(speaker)))?;
    for field in ["name", "roleOrg"] {
        match speaker.get(field) {
            None | Some(Value::Null) | Some(Value::Object(_)) => {}
            Some(Value::String(s)) => {
                out.insert(field.to_string(), json!({"en": s, "zh": s}));
            }
            Some(other) => {
                return Err(EntityError::BadText {
                    field,
                    found: json_kind(other),
                })
            }
        }
    }
    Ok(Value::Object(out))
}

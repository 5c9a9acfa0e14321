//! # Business-Rule Validation
//!
//! Cross-reference and convention checks that run after structural
//! validation, as an independent pass over the same document:
//!
//! - session buckets whose key names no category,
//! - categories without sessions,
//! - speakers appearing in more than one session (one warning per id),
//! - time slots that are neither `H:MM - H:MM` nor a known placeholder,
//! - speakers without a photo or with a placeholder photo.
//!
//! Findings are warnings. If the document is too malformed for the pass to
//! run at all, the pass reports a single error instead of propagating.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use confsite_core::text::json_kind;
use confsite_core::{ContextPath, SiteConfig};
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::diagnostic::{Diagnostic, ValidationResult};

/// Accepted shape of a concrete time slot, e.g. `10:15 - 10:50`.
pub const TIME_SLOT_PATTERN: &str = r"^\d{1,2}:\d{2}\s*-\s*\d{1,2}:\d{2}$";

fn time_slot_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(TIME_SLOT_PATTERN).expect("time slot regex must compile"))
}

/// Returns true when `slot` is a concrete `H:MM - H:MM` range or contains a
/// configured placeholder such as `TBD`.
pub fn is_valid_time_slot(slot: &str, config: &SiteConfig) -> bool {
    time_slot_re().is_match(slot.trim()) || config.is_timeslot_placeholder(slot)
}

/// The document shape prevented the business pass from running.
#[derive(Error, Debug)]
#[error("{field} must be {expected}, found {found}")]
struct ShapeError {
    field: &'static str,
    expected: &'static str,
    found: &'static str,
}

fn shape_error(field: &'static str, expected: &'static str, value: Option<&Value>) -> ShapeError {
    ShapeError {
        field,
        expected,
        found: value.map(json_kind).unwrap_or("missing"),
    }
}

/// Run all business rules.
pub fn validate_business_rules(doc: &Value, config: &SiteConfig) -> ValidationResult {
    match run_business_rules(doc, config) {
        Ok(result) => {
            tracing::debug!(
                warnings = result.warning_count(),
                "business rule validation finished"
            );
            result
        }
        Err(e) => {
            tracing::warn!(error = %e, "business rule validation aborted");
            ValidationResult::single(Diagnostic::error(
                "businessRules",
                format!("Business rule validation failed: {e}"),
                &ContextPath::root(),
            ))
        }
    }
}

fn run_business_rules(doc: &Value, config: &SiteConfig) -> Result<ValidationResult, ShapeError> {
    let map = doc
        .as_object()
        .ok_or_else(|| shape_error("scheduleData", "an object", Some(doc)))?;
    let categories = map
        .get("categories")
        .and_then(Value::as_array)
        .ok_or_else(|| shape_error("categories", "an array", map.get("categories")))?;
    let buckets = map
        .get("sessions")
        .and_then(Value::as_object)
        .ok_or_else(|| shape_error("sessions", "an object", map.get("sessions")))?;

    let category_ids: Vec<&str> = categories
        .iter()
        .filter_map(|c| c.get("id").and_then(Value::as_str))
        .collect();

    Ok(orphaned_buckets(buckets, &category_ids)
        .merge(empty_categories(buckets, &category_ids))
        .merge(session_rules(buckets, config)))
}

fn orphaned_buckets(buckets: &Map<String, Value>, category_ids: &[&str]) -> ValidationResult {
    let sessions_path = ContextPath::root().key("sessions");
    buckets
        .keys()
        .filter(|key| !category_ids.contains(&key.as_str()))
        .map(|key| {
            Diagnostic::warning(
                "sessions",
                format!("Sessions reference unknown category \"{key}\""),
                &sessions_path.key(key),
            )
        })
        .collect()
}

fn empty_categories(buckets: &Map<String, Value>, category_ids: &[&str]) -> ValidationResult {
    let categories_path = ContextPath::root().key("categories");
    let mut seen = HashSet::new();
    category_ids
        .iter()
        .enumerate()
        .filter(|(_, id)| seen.insert(**id))
        .filter(|(_, id)| {
            buckets
                .get(**id)
                .and_then(Value::as_array)
                .map_or(true, Vec::is_empty)
        })
        .map(|(i, id)| {
            Diagnostic::warning(
                "categories",
                format!("Category \"{id}\" has no sessions"),
                &categories_path.index(i),
            )
        })
        .collect()
}

fn session_rules(buckets: &Map<String, Value>, config: &SiteConfig) -> ValidationResult {
    let sessions_path = ContextPath::root().key("sessions");
    let mut result = ValidationResult::new();
    let mut session_counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    let mut image_checked: HashSet<&str> = HashSet::new();

    for (key, bucket) in buckets {
        let Some(sessions) = bucket.as_array() else {
            continue;
        };
        for (i, session) in sessions.iter().enumerate() {
            let path = sessions_path.key(key).index(i);

            if let Some(slot) = session.get("timeSlot").and_then(Value::as_str) {
                if !is_valid_time_slot(slot, config) {
                    result = result.with(Diagnostic::warning(
                        "timeSlot",
                        format!("Unusual time slot format: \"{slot}\""),
                        &path,
                    ));
                }
            }

            let Some(speakers) = session.get("speakers").and_then(Value::as_array) else {
                continue;
            };
            let mut in_session: HashSet<&str> = HashSet::new();
            for (j, speaker) in speakers.iter().enumerate() {
                let Some(id) = speaker
                    .get("id")
                    .and_then(Value::as_str)
                    .map(str::trim)
                    .filter(|id| !id.is_empty())
                else {
                    continue;
                };

                if in_session.insert(id) {
                    let count = session_counts.entry(id).or_insert(0);
                    if *count == 0 {
                        first_seen.push(id);
                    }
                    *count += 1;
                }

                if image_checked.insert(id) {
                    if let Some(message) = image_problem(speaker, id, config) {
                        result = result.with(Diagnostic::warning(
                            "image",
                            message,
                            &path.key("speakers").index(j),
                        ));
                    }
                }
            }
        }
    }

    let root = ContextPath::root();
    first_seen
        .into_iter()
        .filter_map(|id| {
            let count = session_counts.get(id).copied().unwrap_or_default();
            (count > 1).then(|| {
                Diagnostic::warning(
                    "speakers",
                    format!("Speaker \"{id}\" appears in {count} sessions"),
                    &root,
                )
            })
        })
        .fold(result, ValidationResult::with)
}

fn image_problem(speaker: &Value, id: &str, config: &SiteConfig) -> Option<String> {
    match speaker
        .get("image")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
    {
        None => Some(format!("Speaker \"{id}\" has no image")),
        Some(image) if config.is_placeholder_image(image) => {
            Some(format!("Speaker \"{id}\" uses placeholder image \"{image}\""))
        }
        Some(_) => None,
    }
}

//! # Structural Validation
//!
//! Presence, type and shape checks for a schedule document. There is one
//! function per entity type; each returns a [`ValidationResult`] and parents
//! merge their children's results, handing each child an indexed
//! [`ContextPath`].
//!
//! ## Text Field Rules
//!
//! | Value                          | Required field        | Optional field |
//! |--------------------------------|-----------------------|----------------|
//! | absent / blank / empty pair    | error                 | valid          |
//! | non-empty plain string         | warning (monolingual) | warning        |
//! | pair with one language         | warning per gap       | warning        |
//! | pair with both languages       | valid                 | valid          |
//! | number, bool, array            | error                 | error          |
//!
//! The message for an unusable required field is the same whether it is
//! absent, blank or an empty pair, so a normalized document never gains
//! new diagnostics.

use std::collections::HashSet;

use confsite_core::text::json_kind;
use confsite_core::{ContextPath, Language, TextValue};
use serde_json::Value;

use crate::diagnostic::{Diagnostic, ValidationResult};
use crate::schema::SchemaValidator;

fn kind_of(value: Option<&Value>) -> &'static str {
    value.map(json_kind).unwrap_or("missing")
}

fn non_blank_str<'a>(entity: &'a Value, key: &str) -> Option<&'a str> {
    entity
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Validate one text field.
pub fn validate_text_field(
    value: &TextValue,
    field: &str,
    required: bool,
    path: &ContextPath,
) -> ValidationResult {
    match value {
        TextValue::Absent => missing_text(field, required, path),
        TextValue::Malformed(kind) => ValidationResult::single(Diagnostic::error(
            field,
            format!("{field} must be a string or an {{en, zh}} object, found {kind}"),
            path,
        )),
        TextValue::Plain(s) if s.trim().is_empty() => missing_text(field, required, path),
        TextValue::Plain(_) => ValidationResult::single(Diagnostic::warning(
            field,
            format!("{field} should be bilingual ({{en, zh}}), found a plain string"),
            path,
        )),
        TextValue::Bilingual { en, zh } => {
            let present = |side: &Option<String>| side.as_deref().is_some_and(|s| !s.trim().is_empty());
            if !present(en) && !present(zh) {
                return missing_text(field, required, path);
            }
            Language::ALL
                .into_iter()
                .filter(|lang| match lang {
                    Language::En => !present(en),
                    Language::Zh => !present(zh),
                })
                .map(|lang| {
                    Diagnostic::warning(
                        field,
                        format!("{field} is missing the '{lang}' translation"),
                        path,
                    )
                })
                .collect()
        }
    }
}

fn missing_text(field: &str, required: bool, path: &ContextPath) -> ValidationResult {
    if required {
        ValidationResult::single(Diagnostic::error(
            field,
            format!("{field} is required"),
            path,
        ))
    } else {
        ValidationResult::new()
    }
}

fn required_texts(entity: &Value, fields: &[&str], path: &ContextPath) -> ValidationResult {
    fields
        .iter()
        .map(|field| validate_text_field(&TextValue::field(entity, field), field, true, path))
        .collect()
}

fn not_an_object(entity_name: &str, field: &str, value: &Value, path: &ContextPath) -> ValidationResult {
    ValidationResult::single(Diagnostic::error(
        field,
        format!("{entity_name} must be an object, found {}", json_kind(value)),
        path,
    ))
}

/// Validate a speaker entry of a session.
pub fn validate_speaker(speaker: &Value, path: &ContextPath) -> ValidationResult {
    if !speaker.is_object() {
        return not_an_object("Speaker", "speaker", speaker, path);
    }

    let mut result = ValidationResult::new();
    if non_blank_str(speaker, "id").is_none() {
        result = result.with(Diagnostic::error("id", "Speaker ID is required", path));
    }
    result = result.merge(required_texts(speaker, &["name", "roleOrg"], path));
    if !speaker.get("tags").is_some_and(Value::is_array) {
        result = result.with(Diagnostic::warning(
            "tags",
            format!(
                "Speaker tags should be an array, found {}",
                kind_of(speaker.get("tags"))
            ),
            path,
        ));
    }
    if non_blank_str(speaker, "image").is_none() {
        result = result.with(Diagnostic::warning("image", "Speaker image is missing", path));
    }
    result
}

/// Validate a session and its speakers.
pub fn validate_session(session: &Value, path: &ContextPath) -> ValidationResult {
    if !session.is_object() {
        return not_an_object("Session", "session", session, path);
    }

    let mut result = ValidationResult::new();
    if non_blank_str(session, "timeSlot").is_none() {
        result = result.with(Diagnostic::error("timeSlot", "timeSlot is required", path));
    }
    result = result
        .merge(required_texts(session, &["date", "title", "content"], path))
        .merge(validate_text_field(
            &TextValue::field(session, "room"),
            "room",
            false,
            path,
        ));

    match session.get("speakers") {
        Some(Value::Array(speakers)) => {
            let speakers_path = path.key("speakers");
            result.merge(
                speakers
                    .iter()
                    .enumerate()
                    .map(|(i, speaker)| validate_speaker(speaker, &speakers_path.index(i)))
                    .collect(),
            )
        }
        other => result.with(Diagnostic::error(
            "speakers",
            format!("Session speakers must be an array, found {}", kind_of(other)),
            path,
        )),
    }
}

/// Validate a category (track) entry.
pub fn validate_category(category: &Value, path: &ContextPath) -> ValidationResult {
    if !category.is_object() {
        return not_an_object("Category", "category", category, path);
    }

    let mut result = ValidationResult::new();
    if non_blank_str(category, "id").is_none() {
        result = result.with(Diagnostic::error("id", "Category ID is required", path));
    }
    result.merge(required_texts(category, &["name", "room"], path))
}

/// Validate a conference day entry.
pub fn validate_day(day: &Value, path: &ContextPath) -> ValidationResult {
    if !day.is_object() {
        return not_an_object("Day", "day", day, path);
    }
    required_texts(day, &["date", "title", "url"], path)
}

/// Structural validation of a whole schedule document.
///
/// Empty `days`/`categories` arrays and an empty `sessions` object are
/// structurally valid here; the stricter site check lives in
/// [`check_site_schedule`](crate::check_site_schedule).
pub fn validate_schedule_structure(doc: &Value) -> ValidationResult {
    let root = ContextPath::root();
    let Some(map) = doc.as_object() else {
        return ValidationResult::single(Diagnostic::error(
            "scheduleData",
            format!("Schedule data must be an object, found {}", json_kind(doc)),
            &root,
        ));
    };

    let mut result = ValidationResult::new();

    match map.get("days") {
        Some(Value::Array(days)) => {
            let days_path = root.key("days");
            result = result.merge(
                days.iter()
                    .enumerate()
                    .map(|(i, day)| validate_day(day, &days_path.index(i)))
                    .collect(),
            );
        }
        other => {
            result = result.with(Diagnostic::error(
                "scheduleData.days",
                format!("days must be an array, found {}", kind_of(other)),
                &root,
            ));
        }
    }

    let category_ids = match map.get("categories") {
        Some(Value::Array(categories)) => {
            let categories_path = root.key("categories");
            result = result
                .merge(
                    categories
                        .iter()
                        .enumerate()
                        .map(|(i, c)| validate_category(c, &categories_path.index(i)))
                        .collect(),
                )
                .merge(duplicate_category_ids(categories));
            Some(
                categories
                    .iter()
                    .filter_map(|c| c.get("id").and_then(Value::as_str))
                    .collect::<HashSet<&str>>(),
            )
        }
        other => {
            result = result.with(Diagnostic::error(
                "scheduleData.categories",
                format!("categories must be an array, found {}", kind_of(other)),
                &root,
            ));
            None
        }
    };

    match map.get("sessions") {
        Some(Value::Object(buckets)) => {
            let sessions_path = root.key("sessions");
            for (key, bucket) in buckets {
                let bucket_path = sessions_path.key(key);
                if category_ids.as_ref().is_some_and(|ids| !ids.contains(key.as_str())) {
                    result = result.with(Diagnostic::warning(
                        "sessions",
                        format!("Session category \"{key}\" has no matching category"),
                        &bucket_path,
                    ));
                }
                match bucket {
                    Value::Array(sessions) => {
                        result = result.merge(
                            sessions
                                .iter()
                                .enumerate()
                                .map(|(i, s)| validate_session(s, &bucket_path.index(i)))
                                .collect(),
                        );
                    }
                    other => {
                        result = result.with(Diagnostic::error(
                            format!("sessions.{key}"),
                            format!(
                                "Sessions for category \"{key}\" must be an array, found {}",
                                json_kind(other)
                            ),
                            &root,
                        ));
                    }
                }
            }
        }
        other => {
            result = result.with(Diagnostic::error(
                "scheduleData.sessions",
                format!("sessions must be an object, found {}", kind_of(other)),
                &root,
            ));
        }
    }

    tracing::debug!(
        errors = result.error_count(),
        warnings = result.warning_count(),
        "structural validation finished"
    );
    result
}

/// One error per distinct category id that occurs more than once.
fn duplicate_category_ids(categories: &[Value]) -> ValidationResult {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    categories
        .iter()
        .filter_map(|c| c.get("id").and_then(Value::as_str))
        .filter(|id| !seen.insert(*id) && reported.insert(*id))
        .map(|id| {
            Diagnostic::error(
                "categories",
                format!("Duplicate category ID: \"{id}\""),
                &ContextPath::root().key("categories"),
            )
        })
        .collect()
}

/// Structural validation plus, when a schema validator is injected, a JSON
/// Schema cross-check whose violations become errors.
pub fn validate_bilingual_schedule(
    doc: &Value,
    schema: Option<&SchemaValidator>,
) -> ValidationResult {
    let result = validate_schedule_structure(doc);
    match schema {
        Some(validator) => result.merge(schema_diagnostics(validator, doc)),
        None => result,
    }
}

fn schema_diagnostics(validator: &SchemaValidator, doc: &Value) -> ValidationResult {
    let root = ContextPath::root();
    match validator.check_schedule(doc) {
        Ok(violations) => violations
            .into_iter()
            .map(|v| {
                let field = if v.pointer.is_empty() {
                    "scheduleData".to_string()
                } else {
                    v.pointer
                };
                Diagnostic::error(field, format!("schema: {}", v.message), &root)
            })
            .collect(),
        Err(e) => ValidationResult::single(Diagnostic::error(
            "schema",
            format!("Schema cross-check could not run: {e}"),
            &root,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> ContextPath {
        ContextPath::root().key("sessions").key("talks").index(2)
    }

    fn speaker() -> Value {
        json!({
            "id": "jane-doe",
            "name": {"en": "Jane Doe", "zh": "简·多伊"},
            "roleOrg": {"en": "Engineer, Acme", "zh": "工程师，Acme"},
            "tags": ["plenary"],
            "image": "jane-doe.jpg"
        })
    }

    fn session() -> Value {
        json!({
            "date": {"en": "Sept 13", "zh": "9月13日"},
            "timeSlot": "10:15 - 10:50",
            "title": {"en": "Opening", "zh": "开幕"},
            "content": {"en": "Welcome", "zh": "欢迎"},
            "speakers": [speaker()]
        })
    }

    fn doc() -> Value {
        json!({
            "days": [{
                "date": {"en": "Sept 13", "zh": "9月13日"},
                "title": {"en": "Day 1", "zh": "第一天"},
                "url": {"en": "/day1", "zh": "/zh/day1"}
            }],
            "categories": [{
                "id": "talks",
                "name": {"en": "Talks", "zh": "演讲"},
                "room": {"en": "Hall A", "zh": "A厅"}
            }],
            "sessions": {"talks": [session()]}
        })
    }

    #[test]
    fn test_required_text_absent_is_error() {
        let r = validate_text_field(&TextValue::Absent, "title", true, &ctx());
        assert!(!r.is_valid());
        assert_eq!(r.errors[0].message, "title is required");
        assert_eq!(r.errors[0].context.as_deref(), Some("sessions.talks[2]"));
    }

    #[test]
    fn test_optional_text_absent_is_valid() {
        let r = validate_text_field(&TextValue::Absent, "room", false, &ctx());
        assert!(r.is_valid());
        assert_eq!(r.warning_count(), 0);
    }

    #[test]
    fn test_required_text_blank_string_is_error() {
        let r = validate_text_field(&TextValue::Plain("  ".into()), "title", true, &ctx());
        assert_eq!(r.error_count(), 1);
    }

    #[test]
    fn test_plain_string_warns_but_valid() {
        let r = validate_text_field(&TextValue::Plain("Opening".into()), "title", true, &ctx());
        assert!(r.is_valid());
        assert_eq!(r.warning_count(), 1);
        assert!(r.warnings[0].message.contains("bilingual"));
    }

    #[test]
    fn test_pair_missing_one_language_warns() {
        let value = TextValue::Bilingual {
            en: Some("Opening".into()),
            zh: None,
        };
        let r = validate_text_field(&value, "title", true, &ctx());
        assert!(r.is_valid());
        assert_eq!(r.warning_count(), 1);
        assert!(r.warnings[0].message.contains("'zh'"));
    }

    #[test]
    fn test_empty_pair_same_message_as_absent() {
        let r = validate_text_field(&TextValue::pair("", ""), "url", true, &ctx());
        assert_eq!(r.errors[0].message, "url is required");
    }

    #[test]
    fn test_malformed_text_is_error() {
        let r = validate_text_field(&TextValue::Malformed("number"), "room", false, &ctx());
        assert_eq!(r.error_count(), 1);
        assert!(r.errors[0].message.contains("number"));
    }

    #[test]
    fn test_valid_speaker() {
        let r = validate_speaker(&speaker(), &ctx());
        assert!(r.is_valid());
        assert_eq!(r.warning_count(), 0);
    }

    #[test]
    fn test_speaker_missing_id_image_tags() {
        let r = validate_speaker(
            &json!({"name": {"en": "A", "zh": "甲"}, "roleOrg": {"en": "B", "zh": "乙"}}),
            &ctx(),
        );
        assert_eq!(r.error_count(), 1);
        assert_eq!(r.errors[0].field, "id");
        let warned: Vec<&str> = r.warnings.iter().map(|w| w.field.as_str()).collect();
        assert_eq!(warned, vec!["tags", "image"]);
    }

    #[test]
    fn test_speaker_not_object() {
        let r = validate_speaker(&json!("jane"), &ctx());
        assert_eq!(r.error_count(), 1);
        assert!(r.errors[0].message.contains("string"));
    }

    #[test]
    fn test_session_speaker_context_is_indexed() {
        let mut s = session();
        s["speakers"] = json!([speaker(), {"name": "Bob"}]);
        let r = validate_session(&s, &ctx());
        let id_error = r.errors.iter().find(|e| e.field == "id").unwrap();
        assert_eq!(
            id_error.context.as_deref(),
            Some("sessions.talks[2].speakers[1]")
        );
    }

    #[test]
    fn test_session_speakers_not_array() {
        let mut s = session();
        s["speakers"] = json!({"id": "x"});
        let r = validate_session(&s, &ctx());
        assert!(r.errors.iter().any(|e| e.field == "speakers"));
    }

    #[test]
    fn test_session_missing_time_slot() {
        let mut s = session();
        s.as_object_mut().unwrap().remove("timeSlot");
        let r = validate_session(&s, &ctx());
        assert_eq!(r.errors[0].field, "timeSlot");
    }

    #[test]
    fn test_category_and_day() {
        assert!(!validate_category(&json!({"name": "Talks"}), &ctx()).is_valid());
        let day = validate_day(&json!({"date": "Sept 13"}), &ctx());
        assert_eq!(day.error_count(), 2);
        assert_eq!(day.warning_count(), 1);
    }

    #[test]
    fn test_valid_document() {
        let r = validate_bilingual_schedule(&doc(), None);
        assert!(r.is_valid(), "unexpected errors: {:?}", r.errors);
        assert_eq!(r.warning_count(), 0);
    }

    #[test]
    fn test_empty_collections_are_structurally_valid() {
        let r = validate_bilingual_schedule(
            &json!({"days": [], "categories": [], "sessions": {}}),
            None,
        );
        assert!(r.is_valid());
    }

    #[test]
    fn test_null_sessions_is_error() {
        let r = validate_bilingual_schedule(
            &json!({"days": [], "categories": [], "sessions": null}),
            None,
        );
        assert!(!r.is_valid());
        assert_eq!(r.errors[0].field, "scheduleData.sessions");
    }

    #[test]
    fn test_non_array_days_skips_element_validation() {
        let r = validate_schedule_structure(&json!({"days": {"date": 1}, "categories": [], "sessions": {}}));
        assert_eq!(r.error_count(), 1);
        assert_eq!(r.errors[0].field, "scheduleData.days");
    }

    #[test]
    fn test_duplicate_category_reported_once() {
        let mut d = doc();
        let cat = d["categories"][0].clone();
        d["categories"] = json!([cat.clone(), cat.clone(), cat]);
        let r = validate_schedule_structure(&d);
        let dups: Vec<_> = r
            .errors
            .iter()
            .filter(|e| e.message.starts_with("Duplicate category ID"))
            .collect();
        assert_eq!(dups.len(), 1);
        assert!(dups[0].message.contains("\"talks\""));
    }

    #[test]
    fn test_unknown_session_key_warns() {
        let mut d = doc();
        d["sessions"]["workshops"] = json!([]);
        let r = validate_schedule_structure(&d);
        assert!(r.is_valid());
        let w = &r.warnings[0];
        assert!(w.message.contains("workshops"));
        assert_eq!(w.context.as_deref(), Some("sessions.workshops"));
    }

    #[test]
    fn test_non_array_bucket_is_error() {
        let mut d = doc();
        d["sessions"]["talks"] = json!("soon");
        let r = validate_schedule_structure(&d);
        assert_eq!(r.errors[0].field, "sessions.talks");
    }

    #[test]
    fn test_top_level_not_object() {
        let r = validate_schedule_structure(&json!([1, 2]));
        assert_eq!(r.errors[0].field, "scheduleData");
    }
}

//! Integration test: accessor behavior over text fields pulled from a
//! realistic schedule entry, and site config loading from disk.

use confsite_core::{
    get_display, get_text, get_text_safe, ConfsiteError, ContextPath, DisplayText, FallbackReason,
    Language, SiteConfig, TextValue,
};
use serde_json::json;

#[test]
fn test_accessors_over_session_fields() {
    let session = json!({
        "title": {"en": "Opening Keynote", "zh": "开幕主题演讲"},
        "content": {"en": "", "zh": "欢迎参加大会。"},
        "room": "Main Hall",
        "date": 20250913,
    });

    let title = TextValue::field(&session, "title");
    assert_eq!(get_text(&title, Language::Zh, "-"), "开幕主题演讲");
    assert_eq!(
        get_display(&title, "-"),
        DisplayText::Pair {
            en: "Opening Keynote".to_string(),
            zh: "开幕主题演讲".to_string(),
        }
    );

    let content = TextValue::field(&session, "content");
    assert_eq!(get_text(&content, Language::En, "-"), "欢迎参加大会。");
    let safe = get_text_safe(&content, Language::En, "-");
    assert_eq!(safe.text, "欢迎参加大会。");
    assert_eq!(safe.notes[0].reason, FallbackReason::LanguageFallback);

    let room = TextValue::field(&session, "room");
    assert_eq!(get_text(&room, Language::Zh, "-"), "Main Hall");
    assert_eq!(get_display(&room, "-").to_string(), "Main Hall");

    let date = TextValue::field(&session, "date");
    assert_eq!(date, TextValue::Malformed("number"));
    assert_eq!(get_text(&date, Language::En, "TBD"), "TBD");
    assert_eq!(
        get_text_safe(&date, Language::En, "TBD").notes[0].reason,
        FallbackReason::InvalidType
    );

    let speakers = TextValue::field(&session, "speakers");
    assert!(speakers.is_absent());
}

#[test]
fn test_context_paths_name_nested_entities() {
    let path = ContextPath::root()
        .key("sessions")
        .key("talks")
        .index(2)
        .key("speakers")
        .index(0);
    assert_eq!(path.as_str(), "sessions.talks[2].speakers[0]");
}

#[test]
fn test_config_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("confsite.yaml"),
        "default_language: zh\ntag_overrides:\n  ws-dora: dora\n",
    )
    .unwrap();
    let config = SiteConfig::discover(None, dir.path()).unwrap();
    assert_eq!(config.default_language, Language::Zh);
    assert_eq!(config.tag_for_bucket("ws-dora"), "dora");
    assert_eq!(config.tag_for_bucket("rust-china-2"), "rustchinaconf");
    assert!(config.is_timeslot_placeholder("TBD"));
}

#[test]
fn test_config_with_unknown_language_fails() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("site.yaml");
    std::fs::write(&path, "default_language: fr\n").unwrap();
    let err = SiteConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfsiteError::Config { .. }));
    assert!(err.to_string().contains("site.yaml"));
}

//! # Bilingual Text: Classification and Accessors
//!
//! Site content carries every user-visible string in English and Chinese.
//! Older data files still hold plain strings for some fields, so a text
//! field in a loaded document can take one of four shapes. [`TextValue`]
//! names them once:
//!
//! | JSON                     | `TextValue`                 |
//! |--------------------------|-----------------------------|
//! | `"Keynote"`              | `Plain("Keynote")`          |
//! | `{"en": "..", "zh": ..}` | `Bilingual { en, zh }`      |
//! | missing key, `null`      | `Absent`                    |
//! | number, bool, array      | `Malformed("number")` etc.  |
//!
//! Non-string members of a pair object are treated as missing languages.
//!
//! ## Accessors
//!
//! - [`get_text`]: picks the requested language, falling back to the
//!   other language and then to a caller-supplied default. Plain strings
//!   pass through verbatim, even when empty.
//! - [`get_text_safe`]: like `get_text`, but trims, treats empty plain
//!   strings as missing, and returns a note for every fallback it takes.
//! - [`get_display`]: keeps both renderings when both exist.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ConfsiteError;

/// A display language of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    #[default]
    En,
    /// Chinese.
    Zh,
}

impl Language {
    /// Both languages, English first.
    pub const ALL: [Language; 2] = [Language::En, Language::Zh];

    /// The JSON key of this language inside a bilingual pair.
    pub fn as_str(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Zh => "zh",
        }
    }

    /// The other language.
    pub fn other(self) -> Language {
        match self {
            Language::En => Language::Zh,
            Language::Zh => Language::En,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = ConfsiteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "en" => Ok(Language::En),
            "zh" => Ok(Language::Zh),
            _ => Err(ConfsiteError::UnknownLanguage(s.to_string())),
        }
    }
}

/// A text field of a loaded document, classified by shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextValue {
    /// A legacy single-language string.
    Plain(String),
    /// An `{en, zh}` pair. Either side may be missing.
    Bilingual {
        /// English rendering.
        en: Option<String>,
        /// Chinese rendering.
        zh: Option<String>,
    },
    /// The key is missing or `null`.
    Absent,
    /// Any other JSON type; carries the type name for diagnostics.
    Malformed(&'static str),
}

impl TextValue {
    /// Classify an optional JSON value.
    pub fn from_json(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => TextValue::Absent,
            Some(Value::String(s)) => TextValue::Plain(s.clone()),
            Some(Value::Object(map)) => TextValue::Bilingual {
                en: map.get("en").and_then(Value::as_str).map(str::to_owned),
                zh: map.get("zh").and_then(Value::as_str).map(str::to_owned),
            },
            Some(other) => TextValue::Malformed(json_kind(other)),
        }
    }

    /// Classify the field `key` of a JSON object. Non-objects yield `Absent`.
    pub fn field(entity: &Value, key: &str) -> Self {
        Self::from_json(entity.get(key))
    }

    /// Build a pair from two string slices.
    pub fn pair(en: &str, zh: &str) -> Self {
        TextValue::Bilingual {
            en: Some(en.to_string()),
            zh: Some(zh.to_string()),
        }
    }

    /// The non-empty rendering for `lang`, if this is a pair that has one.
    pub fn language(&self, lang: Language) -> Option<&str> {
        match self {
            TextValue::Bilingual { en, zh } => {
                let side = match lang {
                    Language::En => en,
                    Language::Zh => zh,
                };
                non_empty(side)
            }
            _ => None,
        }
    }

    /// Returns true when the field is missing or `null`.
    pub fn is_absent(&self) -> bool {
        matches!(self, TextValue::Absent)
    }
}

/// Name of a JSON value's type, as used in diagnostics.
pub fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn non_empty(side: &Option<String>) -> Option<&str> {
    side.as_deref().filter(|s| !s.is_empty())
}

fn non_blank(side: &Option<String>) -> Option<&str> {
    side.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Extract the display string for `lang`.
///
/// - `Plain(s)` returns `s` unchanged.
/// - `Absent` and `Malformed` return `fallback`.
/// - A pair returns the requested language when both are present, the only
///   present language when one is, and `fallback` when neither is.
pub fn get_text(value: &TextValue, lang: Language, fallback: &str) -> String {
    match value {
        TextValue::Plain(s) => s.clone(),
        TextValue::Absent | TextValue::Malformed(_) => fallback.to_string(),
        TextValue::Bilingual { en, zh } => match (non_empty(en), non_empty(zh)) {
            (Some(en), Some(zh)) => match lang {
                Language::En => en.to_string(),
                Language::Zh => zh.to_string(),
            },
            (Some(only), None) | (None, Some(only)) => only.to_string(),
            (None, None) => fallback.to_string(),
        },
    }
}

/// Why [`get_text_safe`] did not return the requested rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// The requested language was empty; the other language was used.
    LanguageFallback,
    /// The value was present but blank.
    EmptyValue,
    /// The value was missing or `null`.
    MissingValue,
    /// The value had an unexpected JSON type.
    InvalidType,
}

impl FallbackReason {
    /// Stable tag for logs.
    pub fn as_str(self) -> &'static str {
        match self {
            FallbackReason::LanguageFallback => "language_fallback",
            FallbackReason::EmptyValue => "empty_value",
            FallbackReason::MissingValue => "missing_value",
            FallbackReason::InvalidType => "invalid_type",
        }
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single fallback decision taken by [`get_text_safe`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FallbackNote {
    /// Category of the decision.
    pub reason: FallbackReason,
    /// Human-readable description.
    pub detail: String,
}

/// Result of [`get_text_safe`]: the text plus every fallback taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extracted {
    /// The display string.
    pub text: String,
    /// Fallback decisions, in the order they were taken.
    pub notes: Vec<FallbackNote>,
}

impl Extracted {
    fn direct(text: &str) -> Self {
        Self {
            text: text.to_string(),
            notes: Vec::new(),
        }
    }

    fn fallback(text: &str, reason: FallbackReason, detail: String) -> Self {
        Self {
            text: text.to_string(),
            notes: vec![FallbackNote { reason, detail }],
        }
    }

    /// Returns true when any fallback was taken.
    pub fn used_fallback(&self) -> bool {
        !self.notes.is_empty()
    }
}

/// Whitespace-tolerant variant of [`get_text`] that reports its fallbacks.
///
/// Unlike `get_text`, a blank plain string is replaced by `fallback`.
/// Returned text is trimmed; `fallback` is returned as given.
pub fn get_text_safe(value: &TextValue, lang: Language, fallback: &str) -> Extracted {
    match value {
        TextValue::Plain(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Extracted::fallback(
                    fallback,
                    FallbackReason::EmptyValue,
                    "plain text is empty".to_string(),
                )
            } else {
                Extracted::direct(trimmed)
            }
        }
        TextValue::Absent => Extracted::fallback(
            fallback,
            FallbackReason::MissingValue,
            "text is missing".to_string(),
        ),
        TextValue::Malformed(kind) => Extracted::fallback(
            fallback,
            FallbackReason::InvalidType,
            format!("expected a string or {{en, zh}} object, found {kind}"),
        ),
        TextValue::Bilingual { en, zh } => {
            let (requested, other) = match lang {
                Language::En => (non_blank(en), non_blank(zh)),
                Language::Zh => (non_blank(zh), non_blank(en)),
            };
            match (requested, other) {
                (Some(text), _) => Extracted::direct(text),
                (None, Some(text)) => Extracted::fallback(
                    text,
                    FallbackReason::LanguageFallback,
                    format!("no '{lang}' text, using '{}'", lang.other()),
                ),
                (None, None) => Extracted::fallback(
                    fallback,
                    FallbackReason::EmptyValue,
                    "both languages are empty".to_string(),
                ),
            }
        }
    }
}

/// Text prepared for display in both languages where possible.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum DisplayText {
    /// Both renderings are available.
    Pair {
        /// English rendering.
        en: String,
        /// Chinese rendering.
        zh: String,
    },
    /// Only one rendering (or the fallback) is available.
    Single(String),
}

impl fmt::Display for DisplayText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DisplayText::Pair { en, zh } => write!(f, "{en} / {zh}"),
            DisplayText::Single(s) => f.write_str(s),
        }
    }
}

/// Keep both renderings when both are present, otherwise collapse.
pub fn get_display(value: &TextValue, fallback: &str) -> DisplayText {
    match value {
        TextValue::Plain(s) if !s.is_empty() => DisplayText::Single(s.clone()),
        TextValue::Bilingual { en, zh } => match (non_empty(en), non_empty(zh)) {
            (Some(en), Some(zh)) => DisplayText::Pair {
                en: en.to_string(),
                zh: zh.to_string(),
            },
            (Some(only), None) | (None, Some(only)) => DisplayText::Single(only.to_string()),
            (None, None) => DisplayText::Single(fallback.to_string()),
        },
        _ => DisplayText::Single(fallback.to_string()),
    }
}

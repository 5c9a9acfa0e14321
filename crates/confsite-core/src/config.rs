//! # Site Configuration
//!
//! Tunables for validation and speaker tooling, loaded from a YAML file
//! (`confsite.yaml` by default). Every field has a default, so an empty
//! file and a missing file behave identically.
//!
//! ```yaml
//! default_language: en
//! placeholder_images: [placeholder.png]
//! timeslot_placeholders: [tbd, all day, 全天]
//! schema_dir: schemas
//! tag_rules:
//!   - prefix: rust-china
//!     tag: rustchinaconf
//! tag_overrides:
//!   keynote: plenary
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfsiteError;
use crate::text::Language;

/// Config file looked up in the working directory when none is given.
pub const DEFAULT_CONFIG_FILE: &str = "confsite.yaml";

/// Maps session buckets whose key starts with `prefix` to a shared event tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRule {
    /// Session bucket key prefix, e.g. `rust-china`.
    pub prefix: String,
    /// Tag given to speakers of matching buckets.
    pub tag: String,
}

/// Settings shared by the validators, the report and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Language used when a command does not ask for one.
    pub default_language: Language,
    /// Speaker image filenames that mean "no photo yet".
    pub placeholder_images: Vec<String>,
    /// Case-insensitive substrings that make a time slot a placeholder.
    pub timeslot_placeholders: Vec<String>,
    /// Directory of `*.schema.json` files for the JSON Schema cross-check.
    pub schema_dir: Option<PathBuf>,
    /// Prefix rules for event tags, first match wins.
    pub tag_rules: Vec<TagRule>,
    /// Exact bucket key to tag mappings, checked before `tag_rules`.
    pub tag_overrides: BTreeMap<String, String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            default_language: Language::En,
            placeholder_images: vec![
                "placeholder.png".to_string(),
                "placeholder.jpg".to_string(),
                "default-avatar.png".to_string(),
            ],
            timeslot_placeholders: vec![
                "tbd".to_string(),
                "all day".to_string(),
                "全天".to_string(),
            ],
            schema_dir: None,
            tag_rules: vec![TagRule {
                prefix: "rust-china".to_string(),
                tag: "rustchinaconf".to_string(),
            }],
            tag_overrides: BTreeMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load a config file.
    ///
    /// # Errors
    ///
    /// Returns `ConfsiteError::Config` if the file cannot be read or is not
    /// a valid config document.
    pub fn load(path: &Path) -> Result<Self, ConfsiteError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfsiteError::Config {
            path: path.display().to_string(),
            reason: format!("cannot read file: {e}"),
        })?;
        let config = Self::from_yaml(&content).map_err(|e| ConfsiteError::Config {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "loaded site config");
        Ok(config)
    }

    /// Load `path` when given, else `confsite.yaml` from `dir` when it
    /// exists, else the defaults.
    pub fn discover(path: Option<&Path>, dir: &Path) -> Result<Self, ConfsiteError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let candidate = dir.join(DEFAULT_CONFIG_FILE);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse a config document. An empty document yields the defaults.
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
    }

    /// Returns true when `image` names a placeholder file. Only the final
    /// path segment is compared, case-insensitively.
    pub fn is_placeholder_image(&self, image: &str) -> bool {
        let file_name = image.trim().rsplit('/').next().unwrap_or_default();
        self.placeholder_images
            .iter()
            .any(|p| p.eq_ignore_ascii_case(file_name))
    }

    /// Returns true when `slot` contains a configured placeholder token.
    pub fn is_timeslot_placeholder(&self, slot: &str) -> bool {
        let lowered = slot.to_lowercase();
        self.timeslot_placeholders
            .iter()
            .any(|token| lowered.contains(&token.to_lowercase()))
    }

    /// Event tag for a session bucket key.
    pub fn tag_for_bucket(&self, key: &str) -> String {
        if let Some(tag) = self.tag_overrides.get(key) {
            return tag.clone();
        }
        self.tag_rules
            .iter()
            .find(|rule| key.starts_with(&rule.prefix))
            .map(|rule| rule.tag.clone())
            .unwrap_or_else(|| key.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(SiteConfig::from_yaml("").unwrap(), SiteConfig::default());
        assert_eq!(SiteConfig::from_yaml("  \n").unwrap(), SiteConfig::default());
    }

    #[test]
    fn test_partial_document_keeps_other_defaults() {
        let config = SiteConfig::from_yaml("default_language: zh\n").unwrap();
        assert_eq!(config.default_language, Language::Zh);
        assert_eq!(
            config.timeslot_placeholders,
            SiteConfig::default().timeslot_placeholders
        );
    }

    #[test]
    fn test_unknown_language_rejected() {
        assert!(SiteConfig::from_yaml("default_language: fr\n").is_err());
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(SiteConfig::from_yaml("placeholders: []\n").is_err());
    }

    #[test]
    fn test_placeholder_image_matches_file_name() {
        let config = SiteConfig::default();
        assert!(config.is_placeholder_image("placeholder.png"));
        assert!(config.is_placeholder_image("/images/speakers/Placeholder.PNG"));
        assert!(!config.is_placeholder_image("jane-doe.jpg"));
    }

    #[test]
    fn test_timeslot_placeholder_is_case_insensitive() {
        let config = SiteConfig::default();
        assert!(config.is_timeslot_placeholder("TBD"));
        assert!(config.is_timeslot_placeholder("All Day"));
        assert!(config.is_timeslot_placeholder("全天"));
        assert!(!config.is_timeslot_placeholder("10:00 - 11:00"));
    }

    #[test]
    fn test_tag_for_bucket() {
        let mut config = SiteConfig::default();
        config
            .tag_overrides
            .insert("keynote".to_string(), "plenary".to_string());
        assert_eq!(config.tag_for_bucket("rust-china-2"), "rustchinaconf");
        assert_eq!(config.tag_for_bucket("keynote"), "plenary");
        assert_eq!(config.tag_for_bucket("ws-dora"), "ws-dora");
    }

    #[test]
    fn test_load_missing_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SiteConfig::load(&dir.path().join("nope.yaml")).unwrap_err();
        assert!(matches!(err, ConfsiteError::Config { .. }));
    }

    #[test]
    fn test_discover_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = SiteConfig::discover(None, dir.path()).unwrap();
        assert_eq!(config, SiteConfig::default());

        std::fs::write(dir.path().join(DEFAULT_CONFIG_FILE), "default_language: zh\n").unwrap();
        let config = SiteConfig::discover(None, dir.path()).unwrap();
        assert_eq!(config.default_language, Language::Zh);
    }
}

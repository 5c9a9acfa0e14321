//! # confsite-cli: Conference Site Command-Line Interface
//!
//! Provides the `confsite` binary used by site builds and by maintainers
//! editing schedule data.
//!
//! ## Subcommands
//!
//! - `confsite check`: Strict pre-build gate for a schedule file.
//! - `confsite validate`: Full validation report with statistics.
//! - `confsite normalize`: Print a render-ready copy of a schedule.
//! - `confsite speakers check`: Cross-check roster files against the schedule.
//! - `confsite speakers tags`: Derive speaker event tags from the schedule.
//!
//! ```bash
//! confsite check data/ScheduleBilingual.json
//! confsite validate data/ScheduleBilingual.json --schema-dir schemas
//! confsite speakers tags --schedule data/ScheduleBilingual.json --roster data/Speakers.json
//! ```
//!
//! ## Crate Policy
//!
//! - Handler functions delegate to `confsite-schema`; no validation logic here.
//! - Data files are only read. Results go to stdout, logs to stderr.
//! - Exit codes: 0 success, 1 check or validation failure, 2 operational error.

pub mod check;
pub mod normalize;
pub mod speakers;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use confsite_core::SiteConfig;
use confsite_schema::SchemaValidator;

/// Configuration shared by all subcommands.
#[derive(Debug, Clone)]
pub struct CliContext {
    /// The effective site configuration.
    pub config: SiteConfig,
    /// Directory that relative config paths are resolved against.
    pub base_dir: PathBuf,
}

impl CliContext {
    /// Load `config_path` when given, else `confsite.yaml` from `cwd` when
    /// present, else the defaults.
    pub fn load(config_path: Option<&Path>, cwd: &Path) -> Result<Self> {
        let config = SiteConfig::discover(config_path, cwd).context("failed to load site config")?;
        let base_dir = config_path
            .and_then(Path::parent)
            .map(|p| resolve_path(p, cwd))
            .unwrap_or_else(|| cwd.to_path_buf());
        Ok(Self { config, base_dir })
    }

    /// Build the schema validator from `override_dir`, else from the
    /// configured `schema_dir`. `None` when neither is set.
    pub fn schema_validator(&self, override_dir: Option<&Path>) -> Result<Option<SchemaValidator>> {
        let dir = match (override_dir, &self.config.schema_dir) {
            (Some(dir), _) => dir.to_path_buf(),
            (None, Some(dir)) => resolve_path(dir, &self.base_dir),
            (None, None) => return Ok(None),
        };
        let validator = SchemaValidator::new(&dir)
            .with_context(|| format!("failed to load JSON schemas from {}", dir.display()))?;
        tracing::info!(
            schema_count = validator.schema_count(),
            schema_dir = %dir.display(),
            "loaded schema registry"
        );
        Ok(Some(validator))
    }
}

/// Resolve `path` against `base` unless it is absolute.
pub fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_path() {
        let base = Path::new("/site");
        assert_eq!(resolve_path(Path::new("schemas"), base), PathBuf::from("/site/schemas"));
        assert_eq!(resolve_path(Path::new("/abs"), base), PathBuf::from("/abs"));
    }

    #[test]
    fn test_context_defaults_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = CliContext::load(None, dir.path()).unwrap();
        assert_eq!(ctx.config, SiteConfig::default());
        assert_eq!(ctx.base_dir, dir.path());
        assert!(ctx.schema_validator(None).unwrap().is_none());
    }

    #[test]
    fn test_schema_dir_relative_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let site = dir.path().join("site");
        std::fs::create_dir_all(site.join("schemas")).unwrap();
        std::fs::write(site.join("schemas/empty.schema.json"), "{}").unwrap();
        let config = site.join("confsite.yaml");
        std::fs::write(&config, "schema_dir: schemas\n").unwrap();

        let ctx = CliContext::load(Some(&config), dir.path()).unwrap();
        assert_eq!(ctx.base_dir, site);
        let validator = ctx.schema_validator(None).unwrap().unwrap();
        assert_eq!(validator.schema_count(), 1);
    }

    #[test]
    fn test_missing_config_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CliContext::load(Some(&dir.path().join("nope.yaml")), dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("failed to load site config"));
    }
}

//! # JSON Schema Cross-Check
//!
//! Optional validation of schedule documents against JSON Schema
//! definitions (Draft 2020-12), layered on top of the hand-written
//! structural rules.
//!
//! The validator is an explicit value: callers that want the cross-check
//! construct a [`SchemaValidator`] and pass it into
//! [`validate_bilingual_schedule`](crate::validate_bilingual_schedule).
//! Callers that do not simply pass `None`.
//!
//! ## Schema Resolution
//!
//! Schemas use `$id` URIs of the form
//! `https://schemas.confsite.dev/<filename>`. Cross-schema `$ref`s are
//! resolved against the loaded directory by `$id` or by filename; nothing is
//! ever fetched over the network.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use jsonschema::{Retrieve, Uri, Validator};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// URI prefix used by the schemas shipped with the site.
const SCHEMA_URI_PREFIX: &str = "https://schemas.confsite.dev/";

/// Schema used for schedule documents.
pub const SCHEDULE_SCHEMA: &str = "schedule.schema.json";

/// Why the cross-check could not run.
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The schema directory or one of its files could not be read.
    #[error("cannot read {}: {reason}", .path.display())]
    Unreadable {
        /// Directory or file that failed.
        path: PathBuf,
        /// Underlying IO message.
        reason: String,
    },

    /// A `*.schema.json` file is not JSON.
    #[error("schema '{name}' is not valid JSON: {reason}")]
    InvalidJson {
        /// Schema filename.
        name: String,
        /// Parser message.
        reason: String,
    },

    /// No schema with this filename was loaded.
    #[error("schema '{name}' not found")]
    NotFound {
        /// Requested filename.
        name: String,
    },

    /// The schema was loaded but does not compile.
    #[error("schema '{name}' does not compile: {reason}")]
    Compile {
        /// Schema filename.
        name: String,
        /// Compiler message.
        reason: String,
    },
}

/// One place where a document disagrees with its schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaViolation {
    /// JSON Pointer into the document; empty for the root.
    pub pointer: String,
    /// What the schema expected.
    pub message: String,
}

/// Serves `$ref` targets from the loaded directory.
struct DirectoryRetriever {
    by_uri: HashMap<String, Value>,
}

impl Retrieve for DirectoryRetriever {
    fn retrieve(
        &self,
        uri: &Uri<&str>,
    ) -> Result<Value, Box<dyn std::error::Error + Send + Sync>> {
        let uri = uri.as_str();
        let filename = uri.rsplit('/').next().unwrap_or(uri);
        let found = self.by_uri.get(uri).or_else(|| self.by_uri.get(filename));
        // Metaschemas and foreign URIs resolve to the permissive schema.
        Ok(found.cloned().unwrap_or_else(|| serde_json::json!({})))
    }
}

/// The `*.schema.json` files of one directory.
#[derive(Debug)]
pub struct SchemaValidator {
    schemas: HashMap<String, Value>,
}

impl SchemaValidator {
    /// Load every `*.schema.json` file in `dir`. Other files are ignored.
    ///
    /// # Errors
    ///
    /// [`SchemaError::Unreadable`] or [`SchemaError::InvalidJson`].
    pub fn new(dir: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let dir = dir.as_ref();
        let unreadable = |path: &Path, e: std::io::Error| SchemaError::Unreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        };

        let mut schemas = HashMap::new();
        for entry in std::fs::read_dir(dir).map_err(|e| unreadable(dir, e))? {
            let path = entry.map_err(|e| unreadable(dir, e))?.path();
            let Some(name) = path
                .file_name()
                .and_then(|n| n.to_str())
                .filter(|n| n.ends_with(".schema.json"))
            else {
                continue;
            };
            let content =
                std::fs::read_to_string(&path).map_err(|e| unreadable(path.as_path(), e))?;
            let schema: Value =
                serde_json::from_str(&content).map_err(|e| SchemaError::InvalidJson {
                    name: name.to_string(),
                    reason: e.to_string(),
                })?;
            schemas.insert(name.to_string(), schema);
        }

        tracing::debug!(dir = %dir.display(), count = schemas.len(), "loaded schemas");
        Ok(Self { schemas })
    }

    /// Number of schemas loaded.
    pub fn schema_count(&self) -> usize {
        self.schemas.len()
    }

    fn compile(&self, name: &str) -> Result<Validator, SchemaError> {
        let schema = self.schemas.get(name).ok_or_else(|| SchemaError::NotFound {
            name: name.to_string(),
        })?;

        let mut by_uri = HashMap::new();
        for (filename, value) in &self.schemas {
            if let Some(id) = value.get("$id").and_then(Value::as_str) {
                by_uri.insert(id.to_string(), value.clone());
            }
            by_uri.insert(format!("{SCHEMA_URI_PREFIX}{filename}"), value.clone());
            by_uri.insert(filename.clone(), value.clone());
        }

        jsonschema::options()
            .with_draft(jsonschema::Draft::Draft202012)
            .with_retriever(DirectoryRetriever { by_uri })
            .build(schema)
            .map_err(|e| SchemaError::Compile {
                name: name.to_string(),
                reason: e.to_string(),
            })
    }

    /// Every violation of `doc` against the schema file `name`, in the
    /// order the validator reports them. Empty when the document conforms.
    pub fn violations(&self, doc: &Value, name: &str) -> Result<Vec<SchemaViolation>, SchemaError> {
        let validator = self.compile(name)?;
        Ok(validator
            .iter_errors(doc)
            .map(|e| SchemaViolation {
                pointer: e.instance_path.to_string(),
                message: e.to_string(),
            })
            .collect())
    }

    /// [`violations`](Self::violations) against [`SCHEDULE_SCHEMA`].
    pub fn check_schedule(&self, doc: &Value) -> Result<Vec<SchemaViolation>, SchemaError> {
        self.violations(doc, SCHEDULE_SCHEMA)
    }
}

//! # Error Types
//!
//! Errors raised by the core crate. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations.
//!
//! Malformed schedule *data* is never an error at this layer: accessors
//! fall back and validators return diagnostics. Only configuration and
//! parsing of explicit user input (language codes, config files) fail.

use thiserror::Error;

/// Top-level error type for the core crate.
#[derive(Error, Debug)]
pub enum ConfsiteError {
    /// A language code other than `en` or `zh` was supplied.
    #[error("unknown language '{0}': expected 'en' or 'zh'")]
    UnknownLanguage(String),

    /// The site configuration file could not be read or parsed.
    #[error("config error for '{path}': {reason}")]
    Config {
        /// Path to the configuration file.
        path: String,
        /// Reason the configuration was rejected.
        reason: String,
    },
}

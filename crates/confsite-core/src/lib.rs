//! # confsite-core: Foundational Types for the Conference Site
//!
//! This crate is the bedrock of the conference site content pipeline. It
//! defines the primitives every other crate works in terms of. It depends on
//! nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Classify text once, at the boundary.** A JSON text field is either a
//!    plain string, an `{en, zh}` pair, absent, or malformed. [`TextValue`]
//!    captures that exactly once; everything downstream matches on the enum
//!    instead of probing JSON shapes again.
//!
//! 2. **Accessors never fail.** [`get_text`], [`get_text_safe`] and
//!    [`get_display`] always produce a displayable value. The safe variant
//!    returns its fallback decisions as data rather than invoking callbacks.
//!
//! 3. **Paths are values.** [`ContextPath`] is an immutable builder so that
//!    every diagnostic can name its location (`sessions.talks[2].speakers[0]`)
//!    without string concatenation scattered through validators.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `confsite-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod config;
pub mod error;
pub mod path;
pub mod text;

// Re-export primary types for ergonomic imports.
pub use config::{SiteConfig, TagRule, DEFAULT_CONFIG_FILE};
pub use error::ConfsiteError;
pub use path::ContextPath;
pub use text::{
    get_display, get_text, get_text_safe, DisplayText, Extracted, FallbackNote, FallbackReason,
    Language, TextValue,
};

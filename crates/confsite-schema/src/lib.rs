//! # confsite-schema: Schedule Validation, Reporting & Normalization
//!
//! Everything that inspects a conference schedule document lives here. All
//! passes work on a borrowed `serde_json::Value` and return their findings
//! as values.
//!
//! ## Validation (`structural`, `business`)
//!
//! - [`validate_schedule_structure`] checks presence, type and shape of
//!   every field, reporting bilingual text problems as errors or warnings.
//! - [`validate_bilingual_schedule`] adds the optional JSON Schema
//!   cross-check from an injected [`SchemaValidator`].
//! - [`validate_business_rules`] checks cross-references and conventions:
//!   orphaned or empty categories, repeated speakers, odd time slots,
//!   placeholder photos.
//!
//! ## Reporting (`report`)
//!
//! [`generate_validation_report`] runs both passes and renders a text
//! report with statistics for build logs.
//!
//! ## Normalization (`normalize`)
//!
//! [`normalize_schedule`] produces a render-ready copy of any input, never
//! failing, and returns what it had to fix or skip.
//!
//! ## Loading (`load`, `site`)
//!
//! [`load_schedule`] and [`load_and_validate`] read documents from disk.
//! [`check_site_schedule`] is the strict pre-build gate, which unlike the
//! library validators rejects empty `days` and `categories`.
//!
//! ## Speaker Rosters (`roster`, `tags`)
//!
//! [`compare_roster`] cross-checks per-language roster files against the
//! schedule; [`derive_speaker_tags`] and [`plan_tag_updates`] keep roster
//! event tags in line with the sessions a speaker appears in.
//!
//! ## Crate Policy
//!
//! - Depends only on `confsite-core` internally.
//! - Malformed data is never an `Err`. Only IO, parse and schema loading
//!   failures are.
//! - Schema `$id` URIs must not change without updating every `$ref`.

pub mod business;
pub mod diagnostic;
pub mod load;
pub mod normalize;
pub mod report;
pub mod roster;
pub mod schema;
pub mod site;
pub mod structural;
pub mod tags;

pub use business::{is_valid_time_slot, validate_business_rules, TIME_SLOT_PATTERN};
pub use diagnostic::{Diagnostic, Severity, ValidationResult};
pub use load::{load_and_validate, load_schedule, ScheduleLoadError, ValidatedSchedule};
pub use normalize::{normalize_schedule, Normalized, ProcessingDiagnostic, ProcessingStage};
pub use report::{
    build_report_at, generate_validation_report, schedule_stats, ScheduleStats, ValidationReport,
};
pub use roster::{compare_roster, NameMismatch, RosterReport, UnmatchedSpeaker};
pub use schema::{SchemaError, SchemaValidator, SchemaViolation, SCHEDULE_SCHEMA};
pub use site::{check_site_schedule, SiteCheckError, SiteSummary};
pub use structural::{validate_bilingual_schedule, validate_schedule_structure};
pub use tags::{derive_speaker_tags, plan_tag_updates, SpeakerTags, TagPlan, TagUpdate};

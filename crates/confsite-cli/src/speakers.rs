//! # Speakers Subcommand
//!
//! Maintenance tools for the per-language speaker rosters that back the
//! speaker profile pages.
//!
//! ## Subcommands
//!
//! - `check`: Report roster names that disagree with the schedule and
//!   speakers listed on only one side. Exits 1 when any name disagrees.
//!   Session titles are shown in `--lang`, else the configured
//!   `default_language`.
//! - `tags`: Derive each speaker's event tags from the sessions they
//!   appear in. With `--roster`, show which roster entries would change;
//!   with `--emit`, print the updated roster JSON instead.
//!
//! Roster files are never modified.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use serde_json::Value;

use confsite_core::Language;
use confsite_schema::{
    compare_roster, derive_speaker_tags, load_schedule, plan_tag_updates, RosterReport, SpeakerTags,
};

use crate::CliContext;

/// Arguments for the `confsite speakers` subcommand.
#[derive(Args, Debug)]
pub struct SpeakersArgs {
    #[command(subcommand)]
    pub command: SpeakersCommand,
}

/// Speakers subcommands.
#[derive(Subcommand, Debug)]
pub enum SpeakersCommand {
    /// Cross-check roster names against the schedule.
    Check {
        /// Schedule JSON file.
        #[arg(long)]
        schedule: PathBuf,
        /// English roster (e.g. Speakers.json).
        #[arg(long)]
        roster_en: PathBuf,
        /// Chinese roster (e.g. SpeakersZh.json).
        #[arg(long)]
        roster_zh: PathBuf,
        /// Language for session titles (`en` or `zh`).
        #[arg(long, value_name = "LANG")]
        lang: Option<Language>,
    },

    /// Derive speaker event tags from the schedule.
    Tags {
        /// Schedule JSON file.
        #[arg(long)]
        schedule: PathBuf,
        /// Roster whose tags should be compared.
        #[arg(long)]
        roster: Option<PathBuf>,
        /// Print the updated roster JSON instead of the change list.
        #[arg(long, requires = "roster")]
        emit: bool,
    },
}

/// Execute the speakers subcommand.
pub fn run_speakers(args: &SpeakersArgs, ctx: &CliContext) -> Result<u8> {
    match &args.command {
        SpeakersCommand::Check {
            schedule,
            roster_en,
            roster_zh,
            lang,
        } => {
            let language = lang.unwrap_or(ctx.config.default_language);
            cmd_check(schedule, roster_en, roster_zh, language)
        }
        SpeakersCommand::Tags {
            schedule,
            roster,
            emit,
        } => cmd_tags(ctx, schedule, roster.as_deref(), *emit),
    }
}

fn load(path: &Path, what: &str) -> Result<Value> {
    load_schedule(path).with_context(|| format!("failed to load {what}"))
}

fn roster_report(
    schedule: &Path,
    roster_en: &Path,
    roster_zh: &Path,
    language: Language,
) -> Result<RosterReport> {
    Ok(compare_roster(
        &load(schedule, "schedule")?,
        &load(roster_en, "English roster")?,
        &load(roster_zh, "Chinese roster")?,
        language,
    ))
}

/// Compare both rosters with the schedule and print the report.
fn cmd_check(schedule: &Path, roster_en: &Path, roster_zh: &Path, language: Language) -> Result<u8> {
    let report = roster_report(schedule, roster_en, roster_zh, language)?;
    print!("{}", report.render());

    if report.has_mismatches() {
        println!(
            "\n{} name mismatch(es) found; these speakers' sessions may not show on their profiles.",
            report.mismatches.len()
        );
        Ok(1)
    } else {
        Ok(0)
    }
}

/// Derive tags, then either print them or plan roster updates.
fn cmd_tags(ctx: &CliContext, schedule: &Path, roster: Option<&Path>, emit: bool) -> Result<u8> {
    let tags = derive_speaker_tags(&load(schedule, "schedule")?, &ctx.config);

    let Some(roster) = roster else {
        print!("{}", render_tags(&tags));
        return Ok(0);
    };

    let plan = plan_tag_updates(&load(roster, "roster")?, &tags);
    if emit {
        for update in &plan.updates {
            tracing::info!(id = %update.id, old = ?update.old, new = ?update.new, "tags changed");
        }
        let json = serde_json::to_string_pretty(&plan.document)?;
        println!("{json}");
    } else {
        print!("{}", plan.render());
    }
    Ok(0)
}

/// Text listing of every speaker's tags.
pub fn render_tags(tags: &SpeakerTags) -> String {
    let multiple = tags.values().filter(|t| t.len() > 1).count();
    let mut out = format!(
        "Total speakers: {}\nSpeakers with multiple tags: {}\nSpeakers with a single tag: {}\n\n",
        tags.len(),
        multiple,
        tags.len() - multiple
    );
    for (id, speaker_tags) in tags {
        out.push_str(&format!("{id}: {}\n", speaker_tags.join(", ")));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use confsite_core::SiteConfig;

    fn ctx() -> CliContext {
        CliContext {
            config: SiteConfig::default(),
            base_dir: PathBuf::from("."),
        }
    }

    struct Files {
        _dir: tempfile::TempDir,
        schedule: PathBuf,
        roster_en: PathBuf,
        roster_zh: PathBuf,
    }

    fn files(zh_name: &str) -> Files {
        let dir = tempfile::tempdir().unwrap();
        let schedule = dir.path().join("schedule.json");
        let roster_en = dir.path().join("Speakers.json");
        let roster_zh = dir.path().join("SpeakersZh.json");
        std::fs::write(
            &schedule,
            r#"{"days": [], "categories": [], "sessions": {"rust-china-1": [
                {"title": "Talk", "speakers": [{"id": "ana", "name": {"en": "Ana", "zh": "安娜"}}]}
            ]}}"#,
        )
        .unwrap();
        std::fs::write(&roster_en, r#"{"speakers": [{"id": "ana", "name": "Ana", "tags": []}]}"#).unwrap();
        std::fs::write(
            &roster_zh,
            format!(r#"{{"speakers": [{{"id": "ana", "name": "{zh_name}", "tags": []}}]}}"#),
        )
        .unwrap();
        Files {
            _dir: dir,
            schedule,
            roster_en,
            roster_zh,
        }
    }

    fn check_args(f: &Files) -> SpeakersArgs {
        SpeakersArgs {
            command: SpeakersCommand::Check {
                schedule: f.schedule.clone(),
                roster_en: f.roster_en.clone(),
                roster_zh: f.roster_zh.clone(),
                lang: None,
            },
        }
    }

    #[test]
    fn test_check_clean() {
        let f = files("安娜");
        assert_eq!(run_speakers(&check_args(&f), &ctx()).unwrap(), 0);
    }

    #[test]
    fn test_check_mismatch_exits_one() {
        let f = files("安");
        assert_eq!(run_speakers(&check_args(&f), &ctx()).unwrap(), 1);
    }

    #[test]
    fn test_check_missing_roster_is_error() {
        let f = files("安娜");
        let args = SpeakersArgs {
            command: SpeakersCommand::Check {
                schedule: f.schedule.clone(),
                roster_en: f.roster_en.with_file_name("nope.json"),
                roster_zh: f.roster_zh.clone(),
                lang: None,
            },
        };
        let err = run_speakers(&args, &ctx()).unwrap_err();
        assert!(format!("{err:#}").contains("failed to load English roster"));
    }

    #[test]
    fn test_session_labels_in_configured_language() {
        let f = files("安娜");
        std::fs::write(
            &f.schedule,
            r#"{"days": [], "categories": [], "sessions": {"rust-china-1": [
                {"title": {"en": "Talk", "zh": "演讲"}, "speakers": [{"id": "ana", "name": {"en": "Ana", "zh": "安"}}]}
            ]}}"#,
        )
        .unwrap();
        let mut ctx = ctx();
        ctx.config.default_language = Language::Zh;

        let language = ctx.config.default_language;
        let report = roster_report(&f.schedule, &f.roster_en, &f.roster_zh, language).unwrap();
        assert_eq!(report.mismatches[0].sessions, vec!["rust-china-1: 演讲"]);
        let report = roster_report(&f.schedule, &f.roster_en, &f.roster_zh, Language::En).unwrap();
        assert_eq!(report.mismatches[0].sessions, vec!["rust-china-1: Talk"]);
    }

    #[test]
    fn test_tags_with_and_without_roster() {
        let f = files("安娜");
        for (roster, emit) in [(None, false), (Some(f.roster_en.clone()), false), (Some(f.roster_en.clone()), true)] {
            let args = SpeakersArgs {
                command: SpeakersCommand::Tags {
                    schedule: f.schedule.clone(),
                    roster,
                    emit,
                },
            };
            assert_eq!(run_speakers(&args, &ctx()).unwrap(), 0);
        }
    }

    #[test]
    fn test_render_tags() {
        let mut tags = SpeakerTags::new();
        tags.insert("ana".to_string(), vec!["plenary".to_string(), "rustchinaconf".to_string()]);
        tags.insert("bo".to_string(), vec!["ws-dora".to_string()]);
        let text = render_tags(&tags);
        assert!(text.contains("Speakers with multiple tags: 1\n"));
        assert!(text.ends_with("ana: plenary, rustchinaconf\nbo: ws-dora\n"));
    }
}

//! # Speaker Roster Cross-Check
//!
//! Speaker profile pages are built from per-language roster files
//! (`{"speakers": [{"id", "name", ...}]}`) while session listings come from
//! the schedule. When the two disagree on a speaker's name, or a speaker is
//! listed in only one of them, sessions silently disappear from profiles.
//! [`compare_roster`] finds those cases.
//!
//! A name is compared only when both the roster and the schedule carry it
//! for that language.

use std::collections::BTreeMap;
use std::fmt;

use confsite_core::{get_text, Language, TextValue};
use serde::Serialize;
use serde_json::Value;

const MAX_LISTED: usize = 10;
const MAX_SESSIONS_LISTED: usize = 2;

/// What the schedule says about one speaker.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScheduleSpeaker {
    /// English name, from the last session that carried one.
    pub en_name: Option<String>,
    /// Chinese name, from the last session that carried one.
    pub zh_name: Option<String>,
    /// `"<category>: <title>"` for each appearance, titles in the
    /// language asked for.
    pub sessions: Vec<String>,
}

/// Collect speakers from every session, keyed by id. Session labels use
/// `language` for the title.
///
/// A plain-string `name` is taken as the English name.
pub fn collect_schedule_speakers(
    schedule: &Value,
    language: Language,
) -> BTreeMap<String, ScheduleSpeaker> {
    let mut speakers: BTreeMap<String, ScheduleSpeaker> = BTreeMap::new();
    let Some(buckets) = schedule.get("sessions").and_then(Value::as_object) else {
        return speakers;
    };
    for (category, bucket) in buckets {
        for session in bucket.as_array().into_iter().flatten() {
            let title = get_text(&TextValue::field(session, "title"), language, "Unknown Session");
            let label = format!("{category}: {title}");
            let entries = session.get("speakers").and_then(Value::as_array);
            for speaker in entries.into_iter().flatten() {
                let Some(id) = speaker.get("id").and_then(Value::as_str).filter(|id| !id.is_empty()) else {
                    continue;
                };
                let entry = speakers.entry(id.to_string()).or_default();
                let (en, zh) = match TextValue::field(speaker, "name") {
                    TextValue::Plain(s) => (Some(s), None),
                    TextValue::Bilingual { en, zh } => (en, zh),
                    TextValue::Absent | TextValue::Malformed(_) => (None, None),
                };
                if let Some(en) = en.filter(|s| !s.is_empty()) {
                    entry.en_name = Some(en);
                }
                if let Some(zh) = zh.filter(|s| !s.is_empty()) {
                    entry.zh_name = Some(zh);
                }
                entry.sessions.push(label.clone());
            }
        }
    }
    speakers
}

/// Map roster ids to their names. Entries without an id are skipped.
pub fn roster_names(roster: &Value) -> BTreeMap<String, Option<String>> {
    roster
        .get("speakers")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|speaker| {
            let id = speaker.get("id").and_then(Value::as_str)?;
            let name = speaker.get("name").and_then(Value::as_str).map(str::to_string);
            Some((id.to_string(), name))
        })
        .collect()
}

/// A speaker whose roster name differs from the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameMismatch {
    /// Speaker id.
    pub id: String,
    /// English roster name.
    pub roster_en: Option<String>,
    /// English schedule name.
    pub schedule_en: Option<String>,
    /// Chinese roster name.
    pub roster_zh: Option<String>,
    /// Chinese schedule name.
    pub schedule_zh: Option<String>,
    /// Sessions the speaker appears in.
    pub sessions: Vec<String>,
}

/// A speaker present on only one side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmatchedSpeaker {
    /// Speaker id.
    pub id: String,
    /// English name, when known.
    pub en_name: Option<String>,
    /// Chinese name, when known.
    pub zh_name: Option<String>,
    /// Sessions, for schedule-only speakers.
    pub sessions: Vec<String>,
}

/// Outcome of [`compare_roster`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RosterReport {
    /// Speakers in the English roster.
    pub roster_en_count: usize,
    /// Speakers in the Chinese roster.
    pub roster_zh_count: usize,
    /// Distinct speakers in the schedule.
    pub schedule_count: usize,
    /// Name disagreements, by id.
    pub mismatches: Vec<NameMismatch>,
    /// Roster speakers with no session.
    pub missing_from_schedule: Vec<UnmatchedSpeaker>,
    /// Schedule speakers absent from both rosters.
    pub missing_from_rosters: Vec<UnmatchedSpeaker>,
}

impl RosterReport {
    /// True when any name disagrees.
    pub fn has_mismatches(&self) -> bool {
        !self.mismatches.is_empty()
    }

    /// Render the report as text.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

fn differs(roster: Option<&str>, schedule: Option<&str>) -> bool {
    match (roster.filter(|s| !s.is_empty()), schedule) {
        (Some(r), Some(s)) => r != s,
        _ => false,
    }
}

/// Compare the rosters against the schedule's speakers. Session labels in
/// the report are rendered in `language`.
pub fn compare_roster(
    schedule: &Value,
    roster_en: &Value,
    roster_zh: &Value,
    language: Language,
) -> RosterReport {
    let en = roster_names(roster_en);
    let zh = roster_names(roster_zh);
    let scheduled = collect_schedule_speakers(schedule, language);

    let mut report = RosterReport {
        roster_en_count: en.len(),
        roster_zh_count: zh.len(),
        schedule_count: scheduled.len(),
        ..RosterReport::default()
    };

    let mut roster_ids: Vec<&String> = en.keys().chain(zh.keys()).collect();
    roster_ids.sort();
    roster_ids.dedup();

    for id in &roster_ids {
        let roster_en = en.get(*id).cloned().flatten();
        let roster_zh = zh.get(*id).cloned().flatten();
        match scheduled.get(*id) {
            None => report.missing_from_schedule.push(UnmatchedSpeaker {
                id: id.to_string(),
                en_name: roster_en,
                zh_name: roster_zh,
                sessions: Vec::new(),
            }),
            Some(info) => {
                if differs(roster_en.as_deref(), info.en_name.as_deref())
                    || differs(roster_zh.as_deref(), info.zh_name.as_deref())
                {
                    report.mismatches.push(NameMismatch {
                        id: id.to_string(),
                        roster_en,
                        schedule_en: info.en_name.clone(),
                        roster_zh,
                        schedule_zh: info.zh_name.clone(),
                        sessions: info.sessions.clone(),
                    });
                }
            }
        }
    }

    report.missing_from_rosters = scheduled
        .into_iter()
        .filter(|(id, _)| !en.contains_key(id) && !zh.contains_key(id))
        .map(|(id, info)| UnmatchedSpeaker {
            id,
            en_name: info.en_name,
            zh_name: info.zh_name,
            sessions: info.sessions,
        })
        .collect();

    tracing::debug!(
        mismatches = report.mismatches.len(),
        missing_from_schedule = report.missing_from_schedule.len(),
        missing_from_rosters = report.missing_from_rosters.len(),
        "roster comparison finished"
    );
    report
}

fn or_dash(name: &Option<String>) -> &str {
    name.as_deref().unwrap_or("-")
}

impl fmt::Display for RosterReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SPEAKER ROSTER CHECK")?;
        writeln!(f, "  Roster (en): {} speakers", self.roster_en_count)?;
        writeln!(f, "  Roster (zh): {} speakers", self.roster_zh_count)?;
        writeln!(f, "  Schedule:    {} unique speakers", self.schedule_count)?;

        writeln!(f)?;
        writeln!(f, "NAME MISMATCHES ({})", self.mismatches.len())?;
        if self.mismatches.is_empty() {
            writeln!(f, "  none")?;
        }
        for m in &self.mismatches {
            writeln!(f, "  {}", m.id)?;
            writeln!(f, "    en: roster={:?} schedule={:?}", or_dash(&m.roster_en), or_dash(&m.schedule_en))?;
            writeln!(f, "    zh: roster={:?} schedule={:?}", or_dash(&m.roster_zh), or_dash(&m.schedule_zh))?;
            writeln!(f, "    sessions: {}", m.sessions.len())?;
            for session in m.sessions.iter().take(MAX_SESSIONS_LISTED) {
                writeln!(f, "      - {session}")?;
            }
            if m.sessions.len() > MAX_SESSIONS_LISTED {
                writeln!(f, "      ... and {} more", m.sessions.len() - MAX_SESSIONS_LISTED)?;
            }
        }

        writeln!(f)?;
        writeln!(f, "IN ROSTER BUT NOT IN SCHEDULE ({})", self.missing_from_schedule.len())?;
        if self.missing_from_schedule.is_empty() {
            writeln!(f, "  none")?;
        }
        for s in self.missing_from_schedule.iter().take(MAX_LISTED) {
            writeln!(f, "  - {} ({} / {})", s.id, or_dash(&s.en_name), or_dash(&s.zh_name))?;
        }
        if self.missing_from_schedule.len() > MAX_LISTED {
            writeln!(f, "  ... and {} more", self.missing_from_schedule.len() - MAX_LISTED)?;
        }

        writeln!(f)?;
        writeln!(f, "IN SCHEDULE BUT NOT IN ROSTER ({})", self.missing_from_rosters.len())?;
        if self.missing_from_rosters.is_empty() {
            writeln!(f, "  none")?;
        }
        for s in &self.missing_from_rosters {
            writeln!(
                f,
                "  - {} ({} / {}), sessions: {}",
                s.id,
                or_dash(&s.en_name),
                or_dash(&s.zh_name),
                s.sessions.len()
            )?;
        }
        Ok(())
    }
}

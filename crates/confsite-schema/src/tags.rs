//! # Speaker Event Tags
//!
//! Speaker profiles carry one tag per track, workshop or co-located event
//! they speak at. Tags are derived from the session bucket keys of the
//! schedule through [`SiteConfig::tag_for_bucket`], so several buckets
//! (e.g. `rust-china-1`, `rust-china-2`) can share one tag.

use std::collections::{BTreeMap, BTreeSet};

use confsite_core::SiteConfig;
use serde::Serialize;
use serde_json::Value;

/// Speaker id to its sorted, deduplicated event tags.
pub type SpeakerTags = BTreeMap<String, Vec<String>>;

/// Derive every scheduled speaker's event tags.
pub fn derive_speaker_tags(schedule: &Value, config: &SiteConfig) -> SpeakerTags {
    let mut tags: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let buckets = schedule.get("sessions").and_then(Value::as_object);
    for (key, bucket) in buckets.into_iter().flatten() {
        let tag = config.tag_for_bucket(key);
        let sessions = bucket.as_array().into_iter().flatten();
        for speaker in sessions
            .filter_map(|s| s.get("speakers").and_then(Value::as_array))
            .flatten()
        {
            if let Some(id) = speaker
                .get("id")
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|id| !id.is_empty())
            {
                tags.entry(id.to_string()).or_default().insert(tag.clone());
            }
        }
    }
    tags.into_iter()
        .map(|(id, set)| (id, set.into_iter().collect()))
        .collect()
}

/// One roster entry whose tags would change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagUpdate {
    /// Speaker id.
    pub id: String,
    /// Tags currently in the roster.
    pub old: Vec<String>,
    /// Tags derived from the schedule.
    pub new: Vec<String>,
}

/// Changes needed to bring a roster's tags in line with the schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagPlan {
    /// Entries whose tags differ, in roster order.
    pub updates: Vec<TagUpdate>,
    /// Roster ids with no session in the schedule, sorted.
    pub unscheduled: Vec<String>,
    /// The roster with `updates` applied.
    pub document: Value,
}

impl TagPlan {
    /// True when the roster is already up to date.
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }

    /// Render the plan as text.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for u in &self.updates {
            out.push_str(&format!("Updated {}: {:?} -> {:?}\n", u.id, u.old, u.new));
        }
        out.push_str(&format!("{} speaker(s) to update\n", self.updates.len()));
        if self.unscheduled.is_empty() {
            out.push_str("All roster speakers appear in at least one session\n");
        } else {
            out.push_str(&format!(
                "Speakers not in any session ({}):\n",
                self.unscheduled.len()
            ));
            for id in &self.unscheduled {
                out.push_str(&format!("  - {id}\n"));
            }
        }
        out
    }
}

/// Compare `roster` tags against `tags`. Order of existing tags is ignored.
pub fn plan_tag_updates(roster: &Value, tags: &SpeakerTags) -> TagPlan {
    let mut document = roster.clone();
    let mut updates = Vec::new();
    let mut unscheduled = BTreeSet::new();

    let entries = document
        .get_mut("speakers")
        .and_then(Value::as_array_mut)
        .into_iter()
        .flatten();
    for speaker in entries {
        let Some(id) = speaker.get("id").and_then(Value::as_str).map(str::to_string) else {
            continue;
        };
        let Some(new) = tags.get(&id) else {
            unscheduled.insert(id);
            continue;
        };
        let old: Vec<String> = speaker
            .get("tags")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect();
        let mut sorted_old = old.clone();
        sorted_old.sort();
        if &sorted_old != new {
            if let Some(obj) = speaker.as_object_mut() {
                obj.insert("tags".to_string(), Value::from(new.clone()));
            }
            updates.push(TagUpdate {
                id,
                old,
                new: new.clone(),
            });
        }
    }

    TagPlan {
        updates,
        unscheduled: unscheduled.into_iter().collect(),
        document,
    }
}

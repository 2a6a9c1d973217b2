use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::change_expiry;
use crate::diff::ChangeKind;
use crate::event::Event;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A time-stamped note that one event was created, modified or cancelled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub event_id: String,
    pub title: String,
    pub kind: ChangeKind,
    /// Human-readable summary, e.g. `location: GRI_F_012 → GRI_F_209`.
    pub details: String,
    pub recorded_at: DateTime<Utc>,
}

impl fmt::Display for ChangeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.kind.symbol(), self.title, self.details)
    }
}

impl ChangeRecord {
    /// Classify the transition from `old` to `new`.
    ///
    /// Returns `None` when nothing watched changed (or both sides are absent).
    pub fn between(old: Option<&Event>, new: Option<&Event>, now: DateTime<Utc>) -> Option<Self> {
        match (old, new) {
            (None, Some(new)) => Some(ChangeRecord {
                event_id: new.id.clone(),
                title: new.title.clone(),
                kind: ChangeKind::Created,
                details: describe_slot(new),
                recorded_at: now,
            }),
            (Some(old), None) => Some(ChangeRecord {
                event_id: old.id.clone(),
                title: old.title.clone(),
                kind: ChangeKind::Cancelled,
                details: format!("{} (removed from feed)", describe_slot(old)),
                recorded_at: now,
            }),
            (Some(old), Some(new)) => {
                let fields = field_changes(old, new);
                if fields.is_empty() {
                    return None;
                }
                Some(ChangeRecord {
                    event_id: new.id.clone(),
                    title: new.title.clone(),
                    kind: ChangeKind::Modified,
                    details: fields.join("; "),
                    recorded_at: now,
                })
            }
            (None, None) => None,
        }
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.recorded_at + change_expiry()
    }

    /// Whether the record is still inside the expiry window at `now`.
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        now - self.recorded_at < change_expiry()
    }

    /// Time left before the record expires, never negative.
    pub fn time_remaining_at(&self, now: DateTime<Utc>) -> Duration {
        (self.expires_at() - now).max(Duration::zero())
    }
}

/// Watched fields that differ, rendered as `"<field>: <old> → <new>"`.
///
/// The watched set is title, start time, end time, location and last modified.
/// Last modified only counts when both versions carry one.
/// Description and the fields derived from it are not watched.
pub fn field_changes(old: &Event, new: &Event) -> Vec<String> {
    let mut changes = Vec::new();

    if old.title != new.title {
        changes.push(format!("title: {} → {}", old.title, new.title));
    }
    if old.start_time != new.start_time {
        changes.push(format!(
            "start time: {} → {}",
            old.start_time.format(TIME_FORMAT),
            new.start_time.format(TIME_FORMAT)
        ));
    }
    if old.end_time != new.end_time {
        changes.push(format!(
            "end time: {} → {}",
            old.end_time.format(TIME_FORMAT),
            new.end_time.format(TIME_FORMAT)
        ));
    }
    if old.location != new.location {
        changes.push(format!(
            "location: {} → {}",
            display_location(&old.location),
            display_location(&new.location)
        ));
    }
    // Only comparable when the feed stamped both versions
    if let (Some(old_modified), Some(new_modified)) = (old.last_modified, new.last_modified) {
        if old_modified != new_modified {
            changes.push(format!(
                "last modified: {} → {}",
                old_modified.format(TIME_FORMAT),
                new_modified.format(TIME_FORMAT)
            ));
        }
    }

    changes
}

fn describe_slot(event: &Event) -> String {
    let mut details = format!("start time: {}", event.start_time.format(TIME_FORMAT));
    if !event.location.is_empty() {
        details.push_str(&format!("; location: {}", event.location));
    }
    details
}

fn display_location(location: &str) -> &str {
    if location.is_empty() { "(none)" } else { location }
}

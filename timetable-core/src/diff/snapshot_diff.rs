//! Snapshot diff computation.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::diff::{ChangeKind, ChangeRecord, fingerprint};
use crate::event::{Event, EventStatus};

/// Result of reconciling a freshly parsed event list with the cached one.
#[derive(Debug, Clone, Default)]
pub struct SnapshotDiff {
    /// The current events, with `status` set to `Modified` where a watched field changed.
    pub events: Vec<Event>,
    pub changes: Vec<ChangeRecord>,
    /// Both lists shared a fingerprint, so no per-event comparison ran.
    pub fingerprint_matched: bool,
}

impl SnapshotDiff {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of (created, modified, cancelled) records.
    pub fn counts(&self) -> (usize, usize, usize) {
        let count = |kind: ChangeKind| self.changes.iter().filter(|c| c.kind == kind).count();
        (
            count(ChangeKind::Created),
            count(ChangeKind::Modified),
            count(ChangeKind::Cancelled),
        )
    }
}

/// Diff `current` against `previous`, matching events by id only.
///
/// - ids only in `current` produce a `Created` record
/// - ids in both whose watched fields differ are marked `Modified` and produce a record
/// - ids only in `previous` produce one `Cancelled` record each and are not kept
///
/// When `previous` is non-empty and both lists share a fingerprint, the
/// per-event comparison is skipped entirely.
pub fn diff_snapshots(previous: &[Event], current: Vec<Event>, now: DateTime<Utc>) -> SnapshotDiff {
    let mut current = current;
    for event in &mut current {
        event.status = EventStatus::Normal;
    }

    if !previous.is_empty() && fingerprint(previous) == fingerprint(&current) {
        debug!(events = current.len(), "snapshot fingerprint unchanged");
        return SnapshotDiff {
            events: current,
            changes: Vec::new(),
            fingerprint_matched: true,
        };
    }

    // Later duplicates overwrite earlier ones, matching the parser
    let previous_by_id: HashMap<&str, &Event> =
        previous.iter().map(|e| (e.id.as_str(), e)).collect();

    let mut changes = Vec::new();
    let mut events = Vec::with_capacity(current.len());

    for mut event in current {
        let old = previous_by_id.get(event.id.as_str()).copied();
        if let Some(change) = ChangeRecord::between(old, Some(&event), now) {
            if change.kind == ChangeKind::Modified {
                event.status = EventStatus::Modified;
            }
            changes.push(change);
        }
        events.push(event);
    }

    let current_ids: HashSet<&str> = events.iter().map(|e| e.id.as_str()).collect();
    let mut reported: HashSet<&str> = HashSet::new();

    for old in previous {
        let id = old.id.as_str();
        if current_ids.contains(id) || !reported.insert(id) {
            continue;
        }
        if let Some(change) = ChangeRecord::between(previous_by_id.get(id).copied(), None, now) {
            changes.push(change);
        }
    }

    SnapshotDiff {
        events,
        changes,
        fingerprint_matched: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;
    use chrono::{Duration, TimeZone};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 19, 8, 0, 0).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap()
    }

    fn event(id: &str, hour_offset: i64) -> Event {
        let start = base_time() + Duration::hours(hour_offset);
        Event {
            id: id.to_string(),
            title: format!("CM {id}"),
            start_time: start,
            end_time: start + Duration::hours(2),
            location: "GRI_F_012".to_string(),
            description: String::new(),
            teacher: String::new(),
            group: String::new(),
            kind: EventKind::Lecture,
            status: EventStatus::Normal,
            last_modified: Some(Utc.with_ymd_and_hms(2026, 1, 3, 14, 11, 29).unwrap()),
        }
    }

    #[test]
    fn test_cancellation_detection() {
        let previous = vec![event("A", 0), event("B", 2), event("C", 4)];
        let current = vec![event("A", 0), event("C", 4)];

        let diff = diff_snapshots(&previous, current, now());

        assert_eq!(diff.changes.len(), 1);
        assert_eq!(diff.changes[0].event_id, "B");
        assert_eq!(diff.changes[0].kind, ChangeKind::Cancelled);
        assert_eq!(diff.events.len(), 2);
        assert!(diff.events.iter().all(|e| e.status == EventStatus::Normal));
    }

    #[test]
    fn test_created_events_keep_normal_status() {
        let previous = vec![event("A", 0)];
        let current = vec![event("A", 0), event("N", 6)];

        let diff = diff_snapshots(&previous, current, now());

        assert_eq!(diff.counts(), (1, 0, 0));
        assert_eq!(diff.changes[0].event_id, "N");
        assert_eq!(diff.events[1].status, EventStatus::Normal);
    }

    #[test]
    fn test_modified_event_is_flagged() {
        let previous = vec![event("A", 0), event("B", 2)];
        let mut moved = event("B", 2);
        moved.location = "GRI_F_209".to_string();
        let current = vec![event("A", 0), moved];

        let diff = diff_snapshots(&previous, current, now());

        assert_eq!(diff.counts(), (0, 1, 0));
        assert_eq!(diff.changes[0].details, "location: GRI_F_012 → GRI_F_209");
        assert_eq!(diff.events[0].status, EventStatus::Normal);
        assert_eq!(diff.events[1].status, EventStatus::Modified);
    }

    #[test]
    fn test_identity_is_the_id_only() {
        let previous = vec![event("A", 0)];
        let mut renamed = event("A", 0);
        renamed.title = "TD Anglais".to_string();
        renamed.start_time += Duration::days(1);
        renamed.end_time += Duration::days(1);

        let diff = diff_snapshots(&previous, vec![renamed], now());

        assert_eq!(diff.events.len(), 1);
        assert_eq!(diff.counts(), (0, 1, 0));
    }

    #[test]
    fn test_description_only_change_emits_nothing() {
        let previous = vec![event("A", 0)];
        let mut current = event("A", 0);
        current.description = "RT112\nDROUHIN Frederic".to_string();

        let diff = diff_snapshots(&previous, vec![current], now());

        assert!(!diff.fingerprint_matched);
        assert!(diff.is_empty());
        assert_eq!(diff.events[0].status, EventStatus::Normal);
    }

    #[test]
    fn test_reordered_feed_takes_fast_path() {
        let previous = vec![event("A", 0), event("B", 2)];
        let current = vec![event("B", 2), event("A", 0)];

        let diff = diff_snapshots(&previous, current, now());

        assert!(diff.fingerprint_matched);
        assert!(diff.is_empty());
        assert_eq!(diff.events.len(), 2);
        assert_eq!(diff.events[0].id, "B");
    }

    #[test]
    fn test_moved_event_runs_full_comparison() {
        let previous = vec![event("A", 0), event("B", 2)];
        let current = vec![event("A", 0), event("B", 3)];

        let diff = diff_snapshots(&previous, current, now());

        assert!(!diff.fingerprint_matched);
        assert_eq!(diff.counts(), (0, 1, 0));
    }

    #[test]
    fn test_first_sync_never_matches_fingerprint() {
        let diff = diff_snapshots(&[], Vec::new(), now());
        assert!(!diff.fingerprint_matched);
    }

    #[test]
    fn test_stale_modified_status_is_reset() {
        let mut flagged = event("A", 0);
        flagged.status = EventStatus::Modified;

        let diff = diff_snapshots(&[event("A", 0)], vec![flagged], now());

        assert_eq!(diff.events[0].status, EventStatus::Normal);
    }

    #[test]
    fn test_first_sync_reports_everything_created() {
        let diff = diff_snapshots(&[], vec![event("A", 0), event("B", 2)], now());
        assert_eq!(diff.counts(), (2, 0, 0));
    }

    #[test]
    fn test_duplicate_previous_ids_cancel_once() {
        let mut older = event("B", 2);
        older.title = "CM old".to_string();
        let previous = vec![older, event("A", 0), event("B", 2)];

        let diff = diff_snapshots(&previous, vec![event("A", 0)], now());

        assert_eq!(diff.counts(), (0, 0, 1));
        assert_eq!(diff.changes[0].title, "CM B");
    }
}

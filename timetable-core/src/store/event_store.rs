use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::constants::{EVENTS_KEY, LAST_SYNC_KEY};
use crate::error::{TimetableError, TimetableResult};
use crate::event::Event;
use crate::store::KeyValueStore;

/// The event set as of the last successful sync.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub events: Vec<Event>,
    pub last_sync: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// Owns the persisted snapshot. Each save replaces the previous one wholesale.
#[derive(Clone)]
pub struct EventStore {
    storage: Arc<dyn KeyValueStore>,
}

impl EventStore {
    pub fn new(storage: Arc<dyn KeyValueStore>) -> Self {
        EventStore { storage }
    }

    /// Load the snapshot, reporting unreadable or corrupt data as an error.
    pub fn try_load(&self) -> TimetableResult<Snapshot> {
        let events = match self.storage.get(EVENTS_KEY)? {
            Some(json) => serde_json::from_str(&json).map_err(|e| {
                TimetableError::Serialization(format!("Could not decode cached events: {e}"))
            })?,
            None => Vec::new(),
        };

        let last_sync = match self.storage.get(LAST_SYNC_KEY)? {
            Some(text) => Some(parse_last_sync(&text)?),
            None => None,
        };

        Ok(Snapshot { events, last_sync })
    }

    /// Load the snapshot, treating any read failure as "no cache".
    pub fn load(&self) -> Snapshot {
        match self.try_load() {
            Ok(snapshot) => {
                debug!(events = snapshot.events.len(), "loaded cached snapshot");
                snapshot
            }
            Err(e) => {
                warn!(error = %e, "could not read cached snapshot, starting from an empty cache");
                Snapshot::default()
            }
        }
    }

    /// Replace the stored snapshot.
    pub fn save(&self, events: &[Event], last_sync: DateTime<Utc>) -> TimetableResult<()> {
        let json = serde_json::to_string(events)
            .map_err(|e| TimetableError::Serialization(e.to_string()))?;

        self.storage.set(EVENTS_KEY, &json)?;
        self.storage.set(LAST_SYNC_KEY, &last_sync.to_rfc3339())?;

        debug!(events = events.len(), "saved snapshot");
        Ok(())
    }

    pub fn last_sync(&self) -> Option<DateTime<Utc>> {
        let text = self.storage.get(LAST_SYNC_KEY).ok()??;
        parse_last_sync(&text).ok()
    }

    pub fn clear(&self) -> TimetableResult<()> {
        self.storage.remove(EVENTS_KEY)?;
        self.storage.remove(LAST_SYNC_KEY)
    }
}

fn parse_last_sync(text: &str) -> TimetableResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(text.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| TimetableError::Serialization(format!("Invalid last sync time '{text}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventKind, EventStatus};
    use crate::store::MemoryStore;
    use chrono::TimeZone;

    fn lesson(id: &str) -> Event {
        Event {
            id: id.to_string(),
            title: "SAE 1.05 Traiter des données".to_string(),
            start_time: Utc.with_ymd_and_hms(2026, 1, 21, 12, 30, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2026, 1, 21, 16, 0, 0).unwrap(),
            location: "GRI_F_209".to_string(),
            description: "RT11".to_string(),
            teacher: String::new(),
            group: "RT11".to_string(),
            kind: EventKind::Project,
            status: EventStatus::Modified,
            last_modified: Some(Utc.with_ymd_and_hms(2026, 1, 3, 14, 11, 29).unwrap()),
        }
    }

    #[test]
    fn test_empty_store_loads_empty_snapshot() {
        let store = EventStore::new(Arc::new(MemoryStore::new()));
        let snapshot = store.try_load().unwrap();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.last_sync, None);
    }

    #[test]
    fn test_save_then_load() {
        let store = EventStore::new(Arc::new(MemoryStore::new()));
        let synced_at = Utc.with_ymd_and_hms(2026, 1, 10, 9, 0, 0).unwrap();

        store.save(&[lesson("a"), lesson("b")], synced_at).unwrap();
        let snapshot = store.load();

        assert_eq!(snapshot.events, vec![lesson("a"), lesson("b")]);
        assert_eq!(snapshot.last_sync, Some(synced_at));
        assert_eq!(store.last_sync(), Some(synced_at));
    }

    #[test]
    fn test_corrupt_cache_loads_as_empty() {
        let storage = Arc::new(MemoryStore::new());
        storage.set(EVENTS_KEY, "{not json").unwrap();
        let store = EventStore::new(storage);

        assert!(matches!(store.try_load(), Err(TimetableError::Serialization(_))));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_clear_removes_snapshot() {
        let store = EventStore::new(Arc::new(MemoryStore::new()));
        store.save(&[lesson("a")], Utc::now()).unwrap();

        store.clear().unwrap();

        assert!(store.load().is_empty());
        assert_eq!(store.last_sync(), None);
    }
}

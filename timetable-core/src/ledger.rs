//! Time-bounded "recently changed" ledger.
//!
//! Records are kept for one hour after they were recorded. Reads filter on
//! the fly, so an expired record is never reported even if it has not been
//! pruned yet. Pruning only keeps the stored list small.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, warn};

use crate::constants::CHANGES_KEY;
use crate::diff::ChangeRecord;
use crate::error::{TimetableError, TimetableResult};
use crate::store::KeyValueStore;

pub struct ChangeLedger {
    storage: Arc<dyn KeyValueStore>,
    records: Vec<ChangeRecord>,
}

impl ChangeLedger {
    /// Load the ledger from storage. Unreadable data starts an empty ledger.
    pub fn load(storage: Arc<dyn KeyValueStore>) -> Self {
        let records = match read_records(storage.as_ref()) {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "could not read change ledger, starting empty");
                Vec::new()
            }
        };

        ChangeLedger { storage, records }
    }

    /// Every stored record, expired or not, oldest first.
    pub fn records(&self) -> &[ChangeRecord] {
        &self.records
    }

    pub fn record(&mut self, change: ChangeRecord) -> TimetableResult<()> {
        self.records.push(change);
        self.persist()
    }

    /// Append several records with a single write.
    pub fn record_all(&mut self, changes: impl IntoIterator<Item = ChangeRecord>) -> TimetableResult<()> {
        let before = self.records.len();
        self.records.extend(changes);
        if self.records.len() == before {
            return Ok(());
        }
        self.persist()
    }

    pub fn active_changes(&self) -> Vec<&ChangeRecord> {
        self.active_changes_at(Utc::now())
    }

    /// Records still inside the expiry window, oldest first.
    pub fn active_changes_at(&self, now: DateTime<Utc>) -> Vec<&ChangeRecord> {
        self.records.iter().filter(|r| r.is_active_at(now)).collect()
    }

    pub fn is_active(&self, event_id: &str) -> bool {
        self.is_active_at(event_id, Utc::now())
    }

    pub fn is_active_at(&self, event_id: &str, now: DateTime<Utc>) -> bool {
        self.latest_for(event_id)
            .is_some_and(|r| r.is_active_at(now))
    }

    pub fn time_remaining(&self, event_id: &str) -> Duration {
        self.time_remaining_at(event_id, Utc::now())
    }

    /// Time left on the most recent record for `event_id`, zero when there is none.
    pub fn time_remaining_at(&self, event_id: &str, now: DateTime<Utc>) -> Duration {
        self.latest_for(event_id)
            .map(|r| r.time_remaining_at(now))
            .unwrap_or_else(Duration::zero)
    }

    pub fn prune_expired(&mut self) -> TimetableResult<usize> {
        self.prune_expired_at(Utc::now())
    }

    /// Drop expired records, returning how many were removed.
    pub fn prune_expired_at(&mut self, now: DateTime<Utc>) -> TimetableResult<usize> {
        let before = self.records.len();
        self.records.retain(|r| r.is_active_at(now));
        let removed = before - self.records.len();

        if removed > 0 {
            debug!(removed, "pruned expired change records");
            self.persist()?;
        }
        Ok(removed)
    }

    pub fn clear(&mut self) -> TimetableResult<()> {
        self.records.clear();
        self.storage.remove(CHANGES_KEY)
    }

    fn latest_for(&self, event_id: &str) -> Option<&ChangeRecord> {
        self.records
            .iter()
            .filter(|r| r.event_id == event_id)
            .max_by_key(|r| r.recorded_at)
    }

    fn persist(&self) -> TimetableResult<()> {
        let json = serde_json::to_string(&self.records)
            .map_err(|e| TimetableError::Serialization(e.to_string()))?;
        self.storage.set(CHANGES_KEY, &json)
    }
}

fn read_records(storage: &dyn KeyValueStore) -> TimetableResult<Vec<ChangeRecord>> {
    match storage.get(CHANGES_KEY)? {
        Some(json) => serde_json::from_str(&json).map_err(|e| {
            TimetableError::Serialization(format!("Could not decode change ledger: {e}"))
        }),
        None => Ok(Vec::new()),
    }
}

/// Render a remaining duration as `12m 5s`, or `42s` under a minute.
pub fn format_time_remaining(remaining: Duration) -> String {
    let total = remaining.num_seconds().max(0);
    let minutes = total / 60;
    let seconds = total % 60;

    if minutes > 0 {
        format!("{minutes}m {seconds}s")
    } else {
        format!("{seconds}s")
    }
}

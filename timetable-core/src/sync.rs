//! Sync cycle: fetch, parse, diff, persist.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::diff::{ChangeRecord, diff_snapshots};
use crate::error::{TimetableError, TimetableResult};
use crate::event::Event;
use crate::ics::parse_feed_report;
use crate::ledger::ChangeLedger;
use crate::store::{EventStore, KeyValueStore, Snapshot};
use crate::transport::FeedTransport;

/// What one sync cycle produced.
#[derive(Debug, Clone)]
pub struct SyncOutcome {
    /// Fresh data was fetched and parsed.
    pub success: bool,
    /// The annotated fresh events on success, otherwise the cached ones.
    pub events: Vec<Event>,
    pub last_sync: Option<DateTime<Utc>>,
    /// Changes detected during this cycle.
    pub changes: Vec<ChangeRecord>,
    pub error: Option<String>,
    /// Whether the snapshot and the ledger reached storage.
    pub persisted: bool,
}

impl SyncOutcome {
    fn fallback(cached: Snapshot, error: &TimetableError) -> Self {
        SyncOutcome {
            success: false,
            events: cached.events,
            last_sync: cached.last_sync,
            changes: Vec::new(),
            error: Some(error.to_string()),
            persisted: false,
        }
    }
}

pub struct SyncEngine<T: FeedTransport> {
    feed_url: String,
    transport: T,
    store: EventStore,
    ledger: ChangeLedger,
}

impl<T: FeedTransport> SyncEngine<T> {
    pub fn new(feed_url: impl Into<String>, transport: T, storage: Arc<dyn KeyValueStore>) -> Self {
        SyncEngine {
            feed_url: feed_url.into(),
            transport,
            store: EventStore::new(storage.clone()),
            ledger: ChangeLedger::load(storage),
        }
    }

    pub fn feed_url(&self) -> &str {
        &self.feed_url
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn ledger(&self) -> &ChangeLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut ChangeLedger {
        &mut self.ledger
    }

    /// Serve the cached snapshot, syncing first only when nothing is cached.
    pub async fn initialize(&mut self) -> SyncOutcome {
        let cached = self.store.load();
        if cached.is_empty() {
            debug!("no cached snapshot, running first sync");
            return self.synchronize().await;
        }

        SyncOutcome {
            success: true,
            events: cached.events,
            last_sync: cached.last_sync,
            changes: Vec::new(),
            error: None,
            persisted: true,
        }
    }

    pub async fn synchronize(&mut self) -> SyncOutcome {
        self.synchronize_at(Utc::now()).await
    }

    /// Run one sync cycle with `now` as the clock. One call is one attempt.
    pub async fn synchronize_at(&mut self, now: DateTime<Utc>) -> SyncOutcome {
        if let Err(e) = self.ledger.prune_expired_at(now) {
            warn!(error = %e, "could not prune change ledger");
        }

        let events = match self.fetch_events().await {
            Ok(events) => events,
            Err(e) => {
                warn!(error = %e, "sync failed, serving cached snapshot");
                return SyncOutcome::fallback(self.store.load(), &e);
            }
        };

        let previous = self.store.load();
        let diff = diff_snapshots(&previous.events, events, now);

        let (created, modified, cancelled) = diff.counts();
        info!(
            events = diff.events.len(),
            created, modified, cancelled, "feed synchronized"
        );

        match self.persist(&diff.events, &diff.changes, now) {
            Ok(()) => SyncOutcome {
                success: true,
                events: diff.events,
                last_sync: Some(now),
                changes: diff.changes,
                error: None,
                persisted: true,
            },
            Err(e) => {
                warn!(error = %e, "fresh events could not be saved");
                SyncOutcome {
                    success: true,
                    events: diff.events,
                    last_sync: previous.last_sync,
                    changes: diff.changes,
                    error: Some(format!(
                        "The timetable was updated but could not be saved, changes may not persist: {e}"
                    )),
                    persisted: false,
                }
            }
        }
    }

    async fn fetch_events(&self) -> TimetableResult<Vec<Event>> {
        let body = self.transport.fetch_text(&self.feed_url).await?;
        check_feed_body(&body)?;

        let parsed = parse_feed_report(&body);
        if parsed.skipped > 0 {
            debug!(skipped = parsed.skipped, "some feed entries were skipped");
        }
        if parsed.events.is_empty() {
            return Err(TimetableError::EmptyFeed);
        }
        Ok(parsed.events)
    }

    fn persist(
        &mut self,
        events: &[Event],
        changes: &[ChangeRecord],
        now: DateTime<Utc>,
    ) -> TimetableResult<()> {
        self.store.save(events, now)?;
        self.ledger.record_all(changes.iter().cloned())
    }
}

/// Reject bodies that cannot be calendar data: empty text or a markup page.
fn check_feed_body(body: &str) -> TimetableResult<()> {
    let trimmed = body.trim_start().trim_start_matches('\u{feff}').trim_start();
    if trimmed.is_empty() {
        return Err(TimetableError::Fetch("Server returned an empty response".into()));
    }
    if trimmed.starts_with('<') {
        return Err(TimetableError::Fetch(
            "Server returned a web page instead of calendar data".into(),
        ));
    }
    Ok(())
}

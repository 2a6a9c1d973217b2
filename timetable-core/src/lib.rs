//! Core of the timetable tool.
//!
//! - `ics` turns feed text into typed events and exports snapshots
//! - `diff` compares two snapshots and classifies each change
//! - `ledger` keeps recent changes visible for one hour
//! - `store` persists the snapshot through a key/value backend
//! - `sync` runs a full fetch, parse, diff and persist cycle

pub mod config;
pub mod constants;
pub mod diff;
pub mod error;
pub mod event;
pub mod ics;
pub mod ledger;
pub mod schedule;
pub mod store;
pub mod sync;
pub mod transport;

// Re-export the types most callers need at crate root
pub use config::TimetableConfig;
pub use diff::{ChangeKind, ChangeRecord};
pub use error::{TimetableError, TimetableResult};
pub use event::*;
pub use ledger::{ChangeLedger, format_time_remaining};
pub use store::{EventStore, FileStore, KeyValueStore, MemoryStore, Snapshot};
pub use sync::{SyncEngine, SyncOutcome};
pub use transport::{FeedTransport, HttpTransport};

//! Durable storage of the snapshot and the change ledger.
//!
//! The core only sees a text key/value store. It serializes its own
//! structures, so any backend that can hold a few strings will do.

mod event_store;
mod file_store;
mod memory_store;

pub use event_store::{EventStore, Snapshot};
pub use file_store::FileStore;
pub use memory_store::MemoryStore;

use crate::error::TimetableResult;

/// A key/value blob store holding text values.
///
/// `set` must replace the whole value in one step: a failed write leaves
/// either the old value or the new one, never a mix.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> TimetableResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> TimetableResult<()>;
    fn remove(&self, key: &str) -> TimetableResult<()>;
}

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::{TimetableError, TimetableResult};
use crate::store::KeyValueStore;

/// In-process store, for tests and callers that do not need durability.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> TimetableError {
    TimetableError::Storage("memory store lock poisoned".into())
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> TimetableResult<Option<String>> {
        Ok(self.values.lock().map_err(poisoned)?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> TimetableResult<()> {
        self.values
            .lock()
            .map_err(poisoned)?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> TimetableResult<()> {
        self.values.lock().map_err(poisoned)?.remove(key);
        Ok(())
    }
}

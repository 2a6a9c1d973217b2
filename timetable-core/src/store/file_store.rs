use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::{TimetableError, TimetableResult};
use crate::store::KeyValueStore;

/// Stores each key as a file in one directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> TimetableResult<Option<String>> {
        match std::fs::read_to_string(self.path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TimetableError::Storage(format!("Could not read {key}: {e}"))),
        }
    }

    fn set(&self, key: &str, value: &str) -> TimetableResult<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| {
            TimetableError::Storage(format!("Could not create {}: {e}", self.dir.display()))
        })?;

        let path = self.path(key);
        let temp = self.dir.join(format!("{key}.tmp"));

        // Write then rename so readers never see a half-written value
        std::fs::write(&temp, value)
            .map_err(|e| TimetableError::Storage(format!("Could not write {key}: {e}")))?;
        std::fs::rename(&temp, &path)
            .map_err(|e| TimetableError::Storage(format!("Could not replace {key}: {e}")))?;

        Ok(())
    }

    fn remove(&self, key: &str) -> TimetableResult<()> {
        match std::fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(TimetableError::Storage(format!("Could not remove {key}: {e}"))),
        }
    }
}

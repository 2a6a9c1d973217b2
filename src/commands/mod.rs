pub mod changes;
pub mod export;
pub mod status;
pub mod sync;
pub mod url;
pub mod watch;
pub mod week;

use std::sync::Arc;

use anyhow::Result;
use timetable_core::{FileStore, HttpTransport, KeyValueStore, SyncEngine, TimetableConfig};

/// Storage backed by the configured data directory.
pub fn open_storage(config: &TimetableConfig) -> Arc<dyn KeyValueStore> {
    Arc::new(FileStore::new(config.data_path()))
}

pub fn open_engine(config: &TimetableConfig) -> Result<SyncEngine<HttpTransport>> {
    let transport = HttpTransport::new(config.http_timeout())?;
    Ok(SyncEngine::new(config.feed_url(), transport, open_storage(config)))
}

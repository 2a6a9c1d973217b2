use std::path::Path;

use anyhow::Result;
use timetable_core::ics::generate_ics;
use timetable_core::{EventStore, TimetableConfig};

use crate::render::pluralize;

pub fn run(config: &TimetableConfig, path: &Path) -> Result<()> {
    let snapshot = EventStore::new(super::open_storage(config)).try_load()?;

    if snapshot.is_empty() {
        anyhow::bail!("Nothing to export yet. Run `timetable sync` first.");
    }

    std::fs::write(path, generate_ics(&snapshot.events))?;

    let count = snapshot.events.len();
    println!("Exported {} {} to {}", count, pluralize("event", count), path.display());
    Ok(())
}

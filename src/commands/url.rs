use anyhow::Result;
use owo_colors::OwoColorize;
use timetable_core::{ChangeLedger, EventStore, TimetableConfig};

pub fn run(mut config: TimetableConfig, url: &str) -> Result<()> {
    let previous = config.feed_url().to_string();
    config.set_feed_url(url)?;

    if config.feed_url() == previous {
        println!("Feed URL unchanged.");
        return Ok(());
    }

    config.save()?;

    // Events of the old feed would all show up as cancelled on the next sync
    let storage = super::open_storage(&config);
    EventStore::new(storage.clone()).clear()?;
    ChangeLedger::load(storage).clear()?;

    println!("Feed URL set to {}", config.feed_url().green());
    println!("Run `timetable sync` to fetch it.");
    Ok(())
}

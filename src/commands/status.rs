use anyhow::Result;
use owo_colors::OwoColorize;
use timetable_core::{ChangeLedger, EventStore, TimetableConfig};

pub fn run(config: &TimetableConfig) -> Result<()> {
    let storage = super::open_storage(config);
    let snapshot = EventStore::new(storage.clone()).load();
    let ledger = ChangeLedger::load(storage);

    println!("{} {}", "Config:".dimmed(), TimetableConfig::config_path()?.display());
    println!("{} {}", "Feed:".dimmed(), config.feed_url());
    println!("{} {}", "Data:".dimmed(), config.data_path().display());
    println!("{} {}", "Cached events:".dimmed(), snapshot.events.len());

    match snapshot.last_sync {
        Some(at) => println!("{} {}", "Last sync:".dimmed(), at.format("%Y-%m-%d %H:%M UTC")),
        None => println!("{} {}", "Last sync:".dimmed(), "never".yellow()),
    }

    println!("{} {}", "Recent changes:".dimmed(), ledger.active_changes().len());

    if config.auto_sync {
        println!(
            "{} every {} min",
            "Auto sync:".dimmed(),
            config.sync_interval_minutes
        );
    } else {
        println!("{} {}", "Auto sync:".dimmed(), "off".yellow());
    }

    Ok(())
}

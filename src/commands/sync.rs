use anyhow::Result;
use owo_colors::OwoColorize;
use timetable_core::{FeedTransport, SyncEngine, SyncOutcome, TimetableConfig};

use crate::render::{Render, pluralize};
use crate::utils::tui;

pub async fn run(config: &TimetableConfig) -> Result<()> {
    let mut engine = super::open_engine(config)?;
    let outcome = sync_once(&mut engine).await;
    report(&outcome, config);

    if !outcome.success {
        anyhow::bail!("Sync failed, showing cached data");
    }
    Ok(())
}

/// One sync cycle behind a spinner.
pub async fn sync_once<T: FeedTransport>(engine: &mut SyncEngine<T>) -> SyncOutcome {
    let spinner = tui::create_spinner("Syncing timetable".to_string());
    let outcome = engine.synchronize().await;
    spinner.finish_and_clear();
    outcome
}

pub fn report(outcome: &SyncOutcome, config: &TimetableConfig) {
    let count = outcome.events.len();
    let header = format!("{} {}", count, pluralize("event", count));

    if outcome.success {
        println!("{} {}", "Synced".green(), header);
    } else {
        println!("{} {}", "Cached".yellow(), header);
    }
    println!("{}", outcome.render());

    if config.notifications {
        for change in &outcome.changes {
            println!("🔔 {}", change);
        }
    }
}

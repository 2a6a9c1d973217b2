use anyhow::Result;
use owo_colors::OwoColorize;
use timetable_core::{ChangeLedger, TimetableConfig, format_time_remaining};

use crate::render::Render;

pub fn run(config: &TimetableConfig, reset: bool) -> Result<()> {
    let mut ledger = ChangeLedger::load(super::open_storage(config));

    if reset {
        ledger.clear()?;
        println!("Cleared recorded changes.");
        return Ok(());
    }

    let now = chrono::Utc::now();
    let active = ledger.active_changes_at(now);

    if active.is_empty() {
        println!("{}", "No changes in the last hour.".dimmed());
        return Ok(());
    }

    for change in active.into_iter().rev() {
        let remaining = format_time_remaining(change.time_remaining_at(now));
        println!("{} {}", change.render(), format!("({remaining} left)").dimmed());
    }

    Ok(())
}

use anyhow::Result;
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use timetable_core::schedule::{group_by_day, week_bounds, week_of};
use timetable_core::{TimetableConfig, format_time_remaining};

use crate::render::Render;
use crate::utils::tui;

pub async fn run(config: &TimetableConfig, day: NaiveDate) -> Result<()> {
    let mut engine = super::open_engine(config)?;

    let spinner = tui::create_spinner("Loading timetable".to_string());
    let outcome = engine.initialize().await;
    spinner.finish_and_clear();

    if let Some(error) = &outcome.error {
        println!("{}", error.red());
    }

    let (from, to) = week_bounds(day);
    println!("Week of {} to {}", from.format("%Y-%m-%d"), to.format("%Y-%m-%d"));

    let events: Vec<_> = week_of(&outcome.events, day).into_iter().cloned().collect();
    if events.is_empty() {
        println!("   {}", "No events this week".dimmed());
        return Ok(());
    }

    let ledger = engine.ledger();
    for (date, day_events) in group_by_day(&events) {
        println!("\n{}", date.render());
        for event in day_events {
            let mut line = format!("   {}", event.render());
            if ledger.is_active(&event.id) {
                let remaining = format_time_remaining(ledger.time_remaining(&event.id));
                line.push_str(&format!(" {}", format!("changed ({remaining} left)").yellow()));
            }
            println!("{line}");
        }
    }

    Ok(())
}

mod commands;
mod render;
mod utils;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use timetable_core::TimetableConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "timetable")]
#[command(about = "Keep an offline copy of your course timetable and see what changed")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the feed now and report what changed
    Sync,
    /// Show the events of one week
    Week {
        /// Any day of the week to show (YYYY-MM-DD, defaults to today)
        date: Option<String>,
    },
    /// List changes from the last hour
    Changes {
        /// Forget all recorded changes
        #[arg(long)]
        reset: bool,
    },
    /// Show configuration and cache state
    Status,
    /// Re-sync periodically until interrupted
    Watch,
    /// Set the feed URL to sync from
    Url { url: String },
    /// Write the cached timetable to an .ics file
    Export { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = TimetableConfig::load()?;

    match cli.command {
        Commands::Sync => commands::sync::run(&config).await,
        Commands::Week { date } => {
            let day = parse_day(date.as_deref())?;
            commands::week::run(&config, day).await
        }
        Commands::Changes { reset } => commands::changes::run(&config, reset),
        Commands::Status => commands::status::run(&config),
        Commands::Watch => commands::watch::run(&config).await,
        Commands::Url { url } => commands::url::run(config, &url),
        Commands::Export { path } => commands::export::run(&config, &path),
    }
}

fn parse_day(date: Option<&str>) -> Result<NaiveDate> {
    match date {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| anyhow::anyhow!("Invalid date '{}'. Expected YYYY-MM-DD", s)),
        None => Ok(chrono::Utc::now().date_naive()),
    }
}

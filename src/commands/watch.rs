use std::future::Future;

use anyhow::Result;
use owo_colors::OwoColorize;
use timetable_core::{FeedTransport, SyncEngine, TimetableConfig};
use tokio::time::{MissedTickBehavior, interval};
use tracing::info;

pub async fn run(config: &TimetableConfig) -> Result<()> {
    if !config.auto_sync {
        anyhow::bail!(
            "Automatic sync is disabled.\n\
            Set auto_sync = true in {} to use watch mode.",
            TimetableConfig::config_path()?.display()
        );
    }

    let mut engine = super::open_engine(config)?;

    println!(
        "{}",
        format!(
            "Syncing every {} min, press Ctrl-C to stop",
            config.sync_interval_minutes
        )
        .dimmed()
    );

    watch_until(&mut engine, config, tokio::signal::ctrl_c()).await;
    Ok(())
}

/// Sync on every interval tick until `shutdown` resolves, even mid-cycle.
async fn watch_until<T, F>(engine: &mut SyncEngine<T>, config: &TimetableConfig, shutdown: F)
where
    T: FeedTransport,
    F: Future,
{
    let mut ticker = interval(config.sync_interval());
    // A tick that fires while a cycle is still running is dropped, never queued
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut shutdown => break,
        }

        tokio::select! {
            outcome = super::sync::sync_once(engine) => {
                println!("\n{}", chrono::Local::now().format("%H:%M").dimmed());
                super::sync::report(&outcome, config);
            }
            _ = &mut shutdown => break,
        }
    }

    info!("watch stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;
    use timetable_core::{MemoryStore, TimetableResult};

    /// A feed whose requests never complete.
    struct StalledFeed;

    #[async_trait]
    impl FeedTransport for StalledFeed {
        async fn fetch_text(&self, _url: &str) -> TimetableResult<String> {
            std::future::pending().await
        }
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_a_stalled_sync() {
        let storage = Arc::new(MemoryStore::new());
        let mut engine = SyncEngine::new("https://example.test/cal.ics", StalledFeed, storage);
        let config = TimetableConfig::default();

        let stopped = tokio::time::timeout(
            Duration::from_secs(5),
            watch_until(&mut engine, &config, tokio::time::sleep(Duration::from_millis(50))),
        )
        .await;

        assert!(stopped.is_ok(), "watch kept running after shutdown");
    }
}

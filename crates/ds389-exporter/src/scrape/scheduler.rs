//! Periodic driver for [`Scraper`].

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval, MissedTickBehavior};

use super::Scraper;

/// Scrape every `period` until `shutdown` flips to true.
///
/// The first scrape runs immediately. Each cycle is awaited in place, so a
/// slow scrape delays the next one; ticks missed meanwhile are skipped. A
/// cycle still in flight when shutdown is signalled is dropped.
pub async fn run(scraper: Scraper, period: Duration, mut shutdown: watch::Receiver<bool>) {
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                tokio::select! {
                    _ = scraper.run_once() => {}
                    _ = stopped(&mut shutdown) => {
                        tracing::info!("scrape in flight abandoned on shutdown");
                        break;
                    }
                }
            }
            _ = stopped(&mut shutdown) => break,
        }
    }

    tracing::info!("scrape loop stopped");
}

/// Resolves once shutdown is requested or the sender is gone.
async fn stopped(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            return;
        }
    }
}

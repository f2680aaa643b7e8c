//! Periodic removal of expired records.
//!
//! Lookups already treat expired records as inactive; the sweep only
//! reclaims storage. Each pass is a single registry call, so no lock is held
//! across more than one batch and foreground traffic is never starved.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::{self, MissedTickBehavior};
use tracing::{info, warn};

use crate::domain::registry::Registry;

/// Runs `sweep_expired` every `interval`, forever.
///
/// The first pass fires immediately so a restart cleans up backlog without
/// waiting a full interval. Sweep failures are logged and retried on the
/// next tick.
pub async fn run_sweeper(registry: Arc<dyn Registry>, interval: Duration) {
    let mut ticker = time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        match registry.sweep_expired().await {
            Ok(0) => {}
            Ok(removed) => {
                metrics::counter!("minilink_urls_swept").increment(removed);
                info!("swept {removed} expired short URLs");
            }
            Err(e) => warn!("expiry sweep failed: {e}"),
        }
    }
}

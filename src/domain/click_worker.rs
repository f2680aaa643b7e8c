//! Background worker that applies queued click events to the registry.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::{debug, warn};

use crate::domain::click_event::ClickEvent;
use crate::domain::registry::{Registry, RegistryError};

/// Drains click events and increments the matching counters.
///
/// Transient storage failures are retried with exponential backoff; a record
/// that disappeared (swept between redirect and accounting) is not an error
/// worth retrying. Failures never propagate anywhere — redirect correctness
/// does not depend on accounting.
///
/// Runs until the sending side of the channel is dropped.
pub async fn run_click_worker(mut rx: mpsc::Receiver<ClickEvent>, registry: Arc<dyn Registry>) {
    while let Some(event) = rx.recv().await {
        let strategy = ExponentialBackoff::from_millis(50).map(jitter).take(3);

        let result = RetryIf::spawn(
            strategy,
            || {
                let registry = registry.clone();
                let code = event.code.clone();
                async move { registry.increment_click(&code).await }
            },
            |e: &RegistryError| matches!(e, RegistryError::Unavailable(_)),
        )
        .await;

        match result {
            Ok(()) => {}
            Err(RegistryError::NotFound { code }) => {
                debug!("click for '{code}' arrived after the record was removed");
            }
            Err(e) => {
                metrics::counter!("minilink_clicks_failed").increment(1);
                warn!("failed to record click for '{}': {e}", event.code);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::NewUrlRecord;
    use crate::infrastructure::persistence::MemoryRegistry;

    #[tokio::test]
    async fn test_worker_applies_queued_clicks() {
        let registry = Arc::new(MemoryRegistry::new());
        registry
            .create(NewUrlRecord {
                code: "abc123".to_string(),
                original_url: "https://example.com".to_string(),
                expires_at: None,
            })
            .await
            .unwrap();

        let (tx, rx) = mpsc::channel(16);
        let worker_registry: Arc<dyn Registry> = registry.clone();
        let worker = tokio::spawn(run_click_worker(rx, worker_registry));

        for _ in 0..5 {
            tx.send(ClickEvent::new("abc123")).await.unwrap();
        }
        drop(tx);
        worker.await.unwrap();

        let record = registry.find_by_code("abc123").await.unwrap().unwrap();
        assert_eq!(record.click_count, 5);
        assert!(record.last_accessed.is_some());
    }

    #[tokio::test]
    async fn test_worker_survives_clicks_for_missing_codes() {
        let registry: Arc<dyn Registry> = Arc::new(MemoryRegistry::new());

        let (tx, rx) = mpsc::channel(16);
        let worker = tokio::spawn(run_click_worker(rx, registry));

        tx.send(ClickEvent::new("ghost1")).await.unwrap();
        drop(tx);

        // Worker exits cleanly instead of panicking or looping.
        worker.await.unwrap();
    }
}

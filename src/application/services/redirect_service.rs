//! Redirect resolution: short code in, live target URL out.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::domain::click_event::ClickEvent;
use crate::domain::registry::Registry;
use crate::error::AppError;
use crate::utils::code_generator::is_valid_code;

/// Typed redirect failures, distinguished so the HTTP layer can answer 404
/// and 410 differently.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RedirectError {
    #[error("'{code}' is not a valid short code")]
    InvalidFormat { code: String },

    #[error("no short URL for code '{code}'")]
    NotFound { code: String },

    #[error("short URL '{code}' has expired")]
    Expired { code: String },
}

/// Resolves short codes to their target URLs.
pub struct RedirectService {
    registry: Arc<dyn Registry>,
    click_tx: mpsc::Sender<ClickEvent>,
}

impl RedirectService {
    pub fn new(registry: Arc<dyn Registry>, click_tx: mpsc::Sender<ClickEvent>) -> Self {
        Self { registry, click_tx }
    }

    /// Resolves `code` to the stored target URL, unmodified.
    ///
    /// Obviously malformed codes are rejected before any store lookup. An
    /// expired record answers as [`RedirectError::Expired`] and is left in
    /// place for the sweeper. On success a click event is queued for the
    /// accounting worker; a full queue drops the event rather than slowing
    /// or failing the redirect.
    pub async fn resolve(&self, code: &str) -> Result<String, AppError> {
        if !is_valid_code(code) {
            return Err(RedirectError::InvalidFormat {
                code: code.to_string(),
            }
            .into());
        }

        let record = match self.registry.find_by_code(code).await? {
            Some(record) => record,
            None => {
                return Err(RedirectError::NotFound {
                    code: code.to_string(),
                }
                .into());
            }
        };

        if record.is_expired() {
            return Err(RedirectError::Expired {
                code: code.to_string(),
            }
            .into());
        }

        if self.click_tx.try_send(ClickEvent::new(code)).is_err() {
            metrics::counter!("minilink_clicks_dropped").increment(1);
        }

        Ok(record.original_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::UrlRecord;
    use crate::domain::registry::MockRegistry;
    use chrono::{Duration, Utc};

    fn active_record(code: &str, url: &str) -> UrlRecord {
        UrlRecord::new(
            code.to_string(),
            url.to_string(),
            Utc::now(),
            None,
            3,
            None,
        )
    }

    fn service_with(
        mock: MockRegistry,
        capacity: usize,
    ) -> (RedirectService, mpsc::Receiver<ClickEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (RedirectService::new(Arc::new(mock), tx), rx)
    }

    #[tokio::test]
    async fn test_resolve_returns_target_and_queues_click() {
        let mut mock = MockRegistry::new();
        mock.expect_find_by_code()
            .withf(|code| code == "abc123")
            .times(1)
            .returning(|_| Ok(Some(active_record("abc123", "https://example.com/a"))));

        let (service, mut rx) = service_with(mock, 16);

        let target = service.resolve("abc123").await.unwrap();

        assert_eq!(target, "https://example.com/a");
        assert_eq!(rx.try_recv().unwrap().code, "abc123");
    }

    #[tokio::test]
    async fn test_resolve_rejects_malformed_code_without_lookup() {
        // No expectation set: any registry call would panic the mock.
        let (service, _rx) = service_with(MockRegistry::new(), 16);

        let err = service.resolve("x").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_resolve_unknown_code() {
        let mut mock = MockRegistry::new();
        mock.expect_find_by_code().times(1).returning(|_| Ok(None));

        let (service, mut rx) = service_with(mock, 16);

        let err = service.resolve("ghost1").await.unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_resolve_expired_code() {
        let mut mock = MockRegistry::new();
        mock.expect_find_by_code().times(1).returning(|_| {
            let mut record = active_record("old123", "https://example.com/a");
            record.expires_at = Some(Utc::now() - Duration::hours(1));
            Ok(Some(record))
        });

        let (service, mut rx) = service_with(mock, 16);

        let err = service.resolve("old123").await.unwrap_err();

        assert_eq!(err.to_error_info().code, "expired");
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_resolve_succeeds_when_click_queue_is_full() {
        let mut mock = MockRegistry::new();
        mock.expect_find_by_code()
            .times(1)
            .returning(|_| Ok(Some(active_record("abc123", "https://example.com/a"))));

        let (service, _rx) = service_with(mock, 1);
        service
            .click_tx
            .try_send(ClickEvent::new("filler"))
            .unwrap();

        let target = service.resolve("abc123").await.unwrap();

        assert_eq!(target, "https://example.com/a");
    }
}

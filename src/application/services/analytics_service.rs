//! Read-only view over active records for the analytics endpoint.

use std::sync::Arc;

use crate::domain::entities::UrlRecord;
use crate::domain::registry::Registry;
use crate::error::AppError;

pub struct AnalyticsService {
    registry: Arc<dyn Registry>,
}

impl AnalyticsService {
    pub fn new(registry: Arc<dyn Registry>) -> Self {
        Self { registry }
    }

    /// All active records, newest first.
    pub async fn overview(&self) -> Result<Vec<UrlRecord>, AppError> {
        Ok(self.registry.list_active().await?)
    }
}

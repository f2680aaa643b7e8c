//! In-process registry backend.
//!
//! One map behind one lock: every mutating operation takes the write guard,
//! which is the single mutual-exclusion boundary that makes `create` and
//! `increment_click` linearizable. Used by the test suite and by deployments
//! without a configured database.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::entities::{NewUrlRecord, UrlRecord};
use crate::domain::registry::{Registry, RegistryError};

#[derive(Default)]
pub struct MemoryRegistry {
    records: RwLock<HashMap<String, UrlRecord>>,
}

impl MemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, HashMap<String, UrlRecord>>, RegistryError> {
        self.records
            .read()
            .map_err(|_| RegistryError::Unavailable("registry lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, HashMap<String, UrlRecord>>, RegistryError> {
        self.records
            .write()
            .map_err(|_| RegistryError::Unavailable("registry lock poisoned".to_string()))
    }
}

#[async_trait]
impl Registry for MemoryRegistry {
    async fn create(&self, record: NewUrlRecord) -> Result<UrlRecord, RegistryError> {
        let mut records = self.write()?;

        if let Some(existing) = records.get(&record.code) {
            if !existing.is_expired() {
                return Err(RegistryError::CodeCollision { code: record.code });
            }
            // Expired holder: fall through and replace it.
        }

        let stored = UrlRecord::new(
            record.code.clone(),
            record.original_url,
            Utc::now(),
            record.expires_at,
            0,
            None,
        );

        records.insert(record.code, stored.clone());

        Ok(stored)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<UrlRecord>, RegistryError> {
        Ok(self.read()?.get(code).cloned())
    }

    async fn find_active_by_original_url(
        &self,
        original_url: &str,
    ) -> Result<Option<UrlRecord>, RegistryError> {
        Ok(self
            .read()?
            .values()
            .filter(|r| r.original_url == original_url && !r.is_expired())
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn increment_click(&self, code: &str) -> Result<(), RegistryError> {
        let mut records = self.write()?;

        let record = records.get_mut(code).ok_or_else(|| RegistryError::NotFound {
            code: code.to_string(),
        })?;

        record.click_count += 1;
        record.last_accessed = Some(Utc::now());

        Ok(())
    }

    async fn list_active(&self) -> Result<Vec<UrlRecord>, RegistryError> {
        let mut active: Vec<UrlRecord> = self
            .read()?
            .values()
            .filter(|r| !r.is_expired())
            .cloned()
            .collect();

        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(active)
    }

    async fn sweep_expired(&self) -> Result<u64, RegistryError> {
        let expired: Vec<String> = self
            .read()?
            .iter()
            .filter(|(_, r)| r.is_expired())
            .map(|(code, _)| code.clone())
            .collect();

        // One short write lock per deletion so foreground traffic is never
        // starved behind a large sweep. Records never un-expire, so the
        // re-check only guards against a concurrent sweep.
        let mut removed = 0;
        for code in expired {
            let mut records = self.write()?;
            if records.get(&code).is_some_and(|r| r.is_expired()) {
                records.remove(&code);
                removed += 1;
            }
        }

        Ok(removed)
    }

    async fn count(&self) -> Result<i64, RegistryError> {
        Ok(self.read()?.len() as i64)
    }
}

//! In-memory storage backend using DashMap for concurrent access.
//!
//! Used by tests and embedded deployments where durability is not needed.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use fedtrust_core::{EntryKey, TrustEntry, TrustEntryType, Violation};

use crate::error::StoreError;
use crate::traits::{TrustStore, ViolationLog};

/// DashMap-backed trust entry store and violation log.
#[derive(Default)]
pub struct MemoryStore {
    entries: DashMap<String, TrustEntry>,
    violations: DashMap<String, Vec<Violation>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, across all types.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl TrustStore for MemoryStore {
    async fn get(&self, key: &EntryKey) -> Result<Option<TrustEntry>, StoreError> {
        Ok(self.entries.get(&key.encode()).map(|e| e.clone()))
    }

    async fn save(&self, entry: &TrustEntry) -> Result<(), StoreError> {
        self.entries.insert(entry.key().encode(), entry.clone());
        Ok(())
    }

    async fn delete(&self, key: &EntryKey) -> Result<(), StoreError> {
        self.entries.remove(&key.encode());
        Ok(())
    }

    async fn exists(&self, key: &EntryKey) -> Result<bool, StoreError> {
        Ok(self.entries.contains_key(&key.encode()))
    }

    async fn find_stale(
        &self,
        window_minutes: i64,
        entry_type: TrustEntryType,
    ) -> Result<Vec<TrustEntry>, StoreError> {
        let cutoff = Utc::now() - Duration::minutes(window_minutes);
        Ok(self
            .entries
            .iter()
            .filter(|e| e.entry_type == entry_type && e.last_update <= cutoff)
            .map(|e| e.clone())
            .collect())
    }

    async fn find_resource_trust(
        &self,
        resource_id: &str,
    ) -> Result<Option<TrustEntry>, StoreError> {
        Ok(self
            .entries
            .iter()
            .find(|e| {
                e.entry_type == TrustEntryType::ResourceTrust
                    && e.resource_id.as_deref() == Some(resource_id)
            })
            .map(|e| e.clone()))
    }
}

#[async_trait]
impl ViolationLog for MemoryStore {
    async fn record(&self, violation: &Violation) -> Result<(), StoreError> {
        self.violations
            .entry(violation.resource_id.clone())
            .or_default()
            .push(violation.clone());
        Ok(())
    }

    async fn count_since(
        &self,
        resource_id: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        Ok(self
            .violations
            .get(resource_id)
            .map(|v| v.iter().filter(|violation| violation.date >= since).count() as u64)
            .unwrap_or(0))
    }
}

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use fedtrust_core::{EntryKey, TrustEntry, TrustEntryType, Violation};

use crate::error::StoreError;

/// Durable key-value store of trust entries, keyed by
/// `(type, platform_id, resource_id)`.
///
/// Per-key writes are atomic; no cross-entry transactions are offered or
/// needed — correctness is defined per logical entity.
#[async_trait]
pub trait TrustStore: Send + Sync {
    /// Fetch the entry stored under the given key.
    async fn get(&self, key: &EntryKey) -> Result<Option<TrustEntry>, StoreError>;

    /// Insert or replace the entry under its own key.
    async fn save(&self, entry: &TrustEntry) -> Result<(), StoreError>;

    /// Delete the entry under the given key. Deleting an absent key is a
    /// no-op, not an error.
    async fn delete(&self, key: &EntryKey) -> Result<(), StoreError>;

    /// Whether an entry exists under the given key.
    async fn exists(&self, key: &EntryKey) -> Result<bool, StoreError>;

    /// All entries of the given type whose `last_update` is at or before
    /// `now - window_minutes`, i.e. the candidates for the next scheduled
    /// recomputation batch.
    async fn find_stale(
        &self,
        window_minutes: i64,
        entry_type: TrustEntryType,
    ) -> Result<Vec<TrustEntry>, StoreError>;

    /// Look up the resource trust entry for a resource id, regardless of the
    /// owning platform.
    async fn find_resource_trust(
        &self,
        resource_id: &str,
    ) -> Result<Option<TrustEntry>, StoreError>;
}

/// Append-only log of SLA violations, queried by resource over a recency
/// window.
#[async_trait]
pub trait ViolationLog: Send + Sync {
    /// Record one violation.
    async fn record(&self, violation: &Violation) -> Result<(), StoreError>;

    /// Count violations for the resource reported at or after `since`.
    async fn count_since(
        &self,
        resource_id: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, StoreError>;
}

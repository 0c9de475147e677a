//! RocksDB storage backend.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rocksdb::{ColumnFamilyDescriptor, Options, DB};

use fedtrust_core::{EntryKey, TrustEntry, TrustEntryType, Violation};

use crate::error::StoreError;
use crate::traits::{TrustStore, ViolationLog};

/// Column family names for the stored data types.
const CF_ENTRIES: &str = "entries";
const CF_VIOLATIONS: &str = "violations";

/// Separator between resource id and sequence in violation keys. Resource
/// ids are free-form, so a byte that cannot appear in them is used.
const VIOLATION_KEY_SEP: u8 = 0;

/// RocksDB-backed trust entry store and violation log.
pub struct RocksStore {
    db: DB,
    /// Disambiguates violation rows recorded within the same instant.
    violation_seq: AtomicU64,
}

impl RocksStore {
    /// Open or create a RocksDB database at the given path with column
    /// families.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        std::fs::create_dir_all(path)?;

        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_descriptors = vec![
            ColumnFamilyDescriptor::new(CF_ENTRIES, Options::default()),
            ColumnFamilyDescriptor::new(CF_VIOLATIONS, Options::default()),
        ];

        let db = DB::open_cf_descriptors(&opts, path, cf_descriptors)?;

        Ok(Self {
            db,
            violation_seq: AtomicU64::new(0),
        })
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily, StoreError> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| StoreError::ColumnFamilyNotFound(name.to_string()))
    }

    fn violation_key(&self, resource_id: &str) -> Vec<u8> {
        let seq = self.violation_seq.fetch_add(1, Ordering::Relaxed);
        let mut key = resource_id.as_bytes().to_vec();
        key.push(VIOLATION_KEY_SEP);
        key.extend_from_slice(&Utc::now().timestamp_millis().to_be_bytes());
        key.extend_from_slice(&seq.to_be_bytes());
        key
    }

    fn decode_entry(key: &[u8], value: &[u8]) -> Result<TrustEntry, StoreError> {
        serde_json::from_slice(value).map_err(|source| StoreError::CorruptRow {
            key: String::from_utf8_lossy(key).into_owned(),
            source,
        })
    }
}

#[async_trait]
impl TrustStore for RocksStore {
    async fn get(&self, key: &EntryKey) -> Result<Option<TrustEntry>, StoreError> {
        let cf = self.cf(CF_ENTRIES)?;
        match self.db.get_cf(&cf, key.encode().as_bytes())? {
            Some(raw) => Ok(Some(Self::decode_entry(key.encode().as_bytes(), &raw)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, entry: &TrustEntry) -> Result<(), StoreError> {
        let cf = self.cf(CF_ENTRIES)?;
        let raw = serde_json::to_vec(entry)?;
        self.db.put_cf(&cf, entry.key().encode().as_bytes(), raw)?;
        Ok(())
    }

    async fn delete(&self, key: &EntryKey) -> Result<(), StoreError> {
        let cf = self.cf(CF_ENTRIES)?;
        self.db.delete_cf(&cf, key.encode().as_bytes())?;
        Ok(())
    }

    async fn exists(&self, key: &EntryKey) -> Result<bool, StoreError> {
        let cf = self.cf(CF_ENTRIES)?;
        Ok(self.db.get_cf(&cf, key.encode().as_bytes())?.is_some())
    }

    async fn find_stale(
        &self,
        window_minutes: i64,
        entry_type: TrustEntryType,
    ) -> Result<Vec<TrustEntry>, StoreError> {
        let cutoff = Utc::now() - Duration::minutes(window_minutes);
        let cf = self.cf(CF_ENTRIES)?;
        let prefix = format!("{}/", entry_type.as_str());

        let mut entries = Vec::new();
        for item in self.db.prefix_iterator_cf(&cf, prefix.as_bytes()) {
            let (key, value) = item?;
            if !key.starts_with(prefix.as_bytes()) {
                break;
            }
            let entry = Self::decode_entry(&key, &value)?;
            if entry.last_update <= cutoff {
                entries.push(entry);
            }
        }
        Ok(entries)
    }

    async fn find_resource_trust(
        &self,
        resource_id: &str,
    ) -> Result<Option<TrustEntry>, StoreError> {
        let cf = self.cf(CF_ENTRIES)?;
        let prefix = format!("{}/", TrustEntryType::ResourceTrust.as_str());

        for item in self.db.prefix_iterator_cf(&cf, prefix.as_bytes()) {
            let (key, value) = item?;
            if !key.starts_with(prefix.as_bytes()) {
                break;
            }
            let entry = Self::decode_entry(&key, &value)?;
            if entry.resource_id.as_deref() == Some(resource_id) {
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl ViolationLog for RocksStore {
    async fn record(&self, violation: &Violation) -> Result<(), StoreError> {
        let cf = self.cf(CF_VIOLATIONS)?;
        let raw = serde_json::to_vec(violation)?;
        self.db
            .put_cf(&cf, self.violation_key(&violation.resource_id), raw)?;
        Ok(())
    }

    async fn count_since(
        &self,
        resource_id: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let cf = self.cf(CF_VIOLATIONS)?;
        let mut prefix = resource_id.as_bytes().to_vec();
        prefix.push(VIOLATION_KEY_SEP);

        let mut count = 0u64;
        for item in self.db.prefix_iterator_cf(&cf, &prefix) {
            let (key, value) = item?;
            if !key.starts_with(&prefix) {
                break;
            }
            let violation: Violation =
                serde_json::from_slice(&value).map_err(|source| StoreError::CorruptRow {
                    key: String::from_utf8_lossy(&key).into_owned(),
                    source,
                })?;
            if violation.date >= since {
                count += 1;
            }
        }
        Ok(count)
    }
}

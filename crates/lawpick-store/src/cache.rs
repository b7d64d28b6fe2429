//! Timestamped list cache used as an offline fallback.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{Storage, StoreError};

/// Storage key of the bill list fallback.
pub const BILL_CACHE_KEY: &str = "law-pick-youth-proposals-cache-v1";

/// Bill list fallback freshness window.
pub const BILL_CACHE_TTL: Duration = Duration::from_secs(6 * 60 * 60);

/// A stored list and when it was fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedList<T> {
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
    #[serde(alias = "proposals")]
    pub items: Vec<T>,
}

/// One namespaced list record in a [`Storage`], valid for `ttl` after it was written.
pub struct ListCache<T> {
    storage: Arc<dyn Storage>,
    key: String,
    ttl: Duration,
    _items: PhantomData<fn() -> T>,
}

impl<T> Clone for ListCache<T> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            key: self.key.clone(),
            ttl: self.ttl,
            _items: PhantomData,
        }
    }
}

impl<T> std::fmt::Debug for ListCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListCache")
            .field("key", &self.key)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl<T: Serialize + DeserializeOwned> ListCache<T> {
    pub fn new(storage: Arc<dyn Storage>, key: impl Into<String>, ttl: Duration) -> Self {
        Self {
            storage,
            key: key.into(),
            ttl,
            _items: PhantomData,
        }
    }

    /// The bill list fallback: [`BILL_CACHE_KEY`], [`BILL_CACHE_TTL`].
    pub fn bills(storage: Arc<dyn Storage>) -> Self {
        Self::new(storage, BILL_CACHE_KEY, BILL_CACHE_TTL)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Replace the stored record with `items`, stamped `now`.
    pub fn persist(&self, items: &[T], now: DateTime<Utc>) -> Result<(), StoreError>
    where
        T: Clone,
    {
        let record = CachedList {
            updated_at: now,
            items: items.to_vec(),
        };
        let json = serde_json::to_string(&record)?;
        self.storage.set(&self.key, &json)?;
        debug!(key = %self.key, count = items.len(), "cached list");
        Ok(())
    }

    /// The stored record if it is no older than the ttl at `now`.
    ///
    /// Expired and unreadable records are removed and reported as absent.
    pub fn load_fresh(&self, now: DateTime<Utc>) -> Option<CachedList<T>> {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!(key = %self.key, "cache miss");
                return None;
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "cache read failed");
                return None;
            }
        };

        let record: CachedList<T> = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(e) => {
                warn!(key = %self.key, error = %e, "discarding corrupt cache record");
                self.discard();
                return None;
            }
        };

        // A timestamp from the future counts as age zero.
        let age = (now - record.updated_at).to_std().unwrap_or_default();
        if age > self.ttl {
            info!(
                key = %self.key,
                updated_at = %record.updated_at,
                age_secs = age.as_secs(),
                "cache record expired"
            );
            self.discard();
            return None;
        }

        debug!(key = %self.key, count = record.items.len(), "cache hit");
        Some(record)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        self.storage.remove(&self.key)
    }

    fn discard(&self) {
        if let Err(e) = self.storage.remove(&self.key) {
            warn!(key = %self.key, error = %e, "failed to remove cache record");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileStorage, MemoryStorage};
    use chrono::TimeZone;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: String,
    }

    fn rows(ids: &[&str]) -> Vec<Row> {
        ids.iter().map(|id| Row { id: id.to_string() }).collect()
    }

    fn at(hour: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, hour, min, 0).unwrap()
    }

    fn memory_cache() -> (Arc<MemoryStorage>, ListCache<Row>) {
        let storage = Arc::new(MemoryStorage::new());
        let cache = ListCache::bills(storage.clone());
        (storage, cache)
    }

    #[test]
    fn fresh_record_is_returned() {
        let (_, cache) = memory_cache();
        cache.persist(&rows(&["a", "b"]), at(9, 0)).unwrap();

        let record = cache.load_fresh(at(14, 59)).unwrap();
        assert_eq!(record.updated_at, at(9, 0));
        assert_eq!(record.items, rows(&["a", "b"]));
    }

    #[test]
    fn record_at_exact_ttl_is_fresh() {
        let (_, cache) = memory_cache();
        cache.persist(&rows(&["a"]), at(9, 0)).unwrap();
        assert!(cache.load_fresh(at(15, 0)).is_some());
    }

    #[test]
    fn expired_record_is_removed() {
        let (storage, cache) = memory_cache();
        cache.persist(&rows(&["a"]), at(9, 0)).unwrap();

        assert!(cache.load_fresh(at(15, 1)).is_none());
        assert_eq!(storage.get(BILL_CACHE_KEY).unwrap(), None);
    }

    #[test]
    fn corrupt_record_is_absent() {
        let (storage, cache) = memory_cache();
        storage.set(BILL_CACHE_KEY, "{not json").unwrap();
        assert!(cache.load_fresh(at(9, 0)).is_none());
        assert_eq!(storage.get(BILL_CACHE_KEY).unwrap(), None);
    }

    #[test]
    fn wire_format_uses_updated_at() {
        let (storage, cache) = memory_cache();
        cache.persist(&rows(&["a"]), at(9, 0)).unwrap();
        let raw = storage.get(BILL_CACHE_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["updatedAt"], "2025-03-01T09:00:00Z");
        assert_eq!(value["items"][0]["id"], "a");
    }

    #[test]
    fn reads_records_written_with_proposals_field() {
        let (storage, cache) = memory_cache();
        storage
            .set(
                BILL_CACHE_KEY,
                r#"{"updatedAt":"2025-03-01T09:00:00.000Z","proposals":[{"id":"x"}]}"#,
            )
            .unwrap();
        let record = cache.load_fresh(at(10, 0)).unwrap();
        assert_eq!(record.items, rows(&["x"]));
    }

    #[test]
    fn survives_reopen_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let first: ListCache<Row> = ListCache::bills(Arc::new(FileStorage::new(dir.path())));
        first.persist(&rows(&["a", "b", "c"]), at(9, 0)).unwrap();

        let second: ListCache<Row> = ListCache::bills(Arc::new(FileStorage::new(dir.path())));
        assert_eq!(second.load_fresh(at(10, 0)).unwrap().items.len(), 3);
    }
}

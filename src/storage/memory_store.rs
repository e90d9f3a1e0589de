//! In-memory store implementation

use std::sync::Arc;

use num_bigint::BigInt;
use tokio::sync::RwLock;

use crate::error::StoreResult;
use crate::storage::adapter::KvStore;
use crate::storage::cache::TypedCache;
use crate::storage::value::StoredValue;

/// In-memory implementation of the store contract
///
/// Observably the host-backed store minus durability: same ordering, same
/// type tagging, same errors, no host round trips. Cloning yields another
/// handle to the same map, so a store handed to a router stays inspectable
/// from the test that built it. Intended for tests and for SDK collaborators
/// needing scratch storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryKvStore {
    cache: Arc<RwLock<TypedCache>>,
}

impl MemoryKvStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys currently stored
    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    /// Returns `true` if no keys are stored
    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }
}

impl KvStore for MemoryKvStore {
    async fn get_string(&self, key: &str) -> StoreResult<Option<String>> {
        Ok(self.cache.read().await.get_string(key)?.map(str::to_string))
    }

    async fn put_string(&self, key: &str, value: &str) -> StoreResult<()> {
        self.cache.write().await.put_string(key, value);
        Ok(())
    }

    async fn get_number(&self, key: &str) -> StoreResult<Option<f64>> {
        self.cache.read().await.get_number(key)
    }

    async fn put_number(&self, key: &str, value: f64) -> StoreResult<()> {
        self.cache.write().await.put_number(key, value);
        Ok(())
    }

    async fn get_bigint(&self, key: &str) -> StoreResult<Option<BigInt>> {
        Ok(self.cache.read().await.get_bigint(key)?.cloned())
    }

    async fn put_bigint(&self, key: &str, value: BigInt) -> StoreResult<()> {
        self.cache.write().await.put_bigint(key, value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.cache.write().await.remove(key);
        Ok(())
    }

    async fn contains_key(&self, key: &str) -> StoreResult<bool> {
        Ok(self.cache.read().await.contains_key(key))
    }

    async fn get_many(&self, keys: &[String]) -> StoreResult<Vec<(String, StoredValue)>> {
        Ok(self.cache.read().await.get_many(keys))
    }

    async fn put_many(&self, entries: Vec<(String, StoredValue)>) -> StoreResult<()> {
        self.cache.write().await.put_many(entries);
        Ok(())
    }

    async fn remove_many(&self, keys: &[String]) -> StoreResult<()> {
        self.cache.write().await.remove_many(keys);
        Ok(())
    }

    async fn iter_range(&self, start: &str, end: &str) -> StoreResult<Vec<(String, StoredValue)>> {
        Ok(self.cache.read().await.iter_range(start, end))
    }

    async fn iter_prefix(&self, prefix: &str) -> StoreResult<Vec<(String, StoredValue)>> {
        Ok(self.cache.read().await.iter_prefix(prefix))
    }

    async fn clear(&self) -> StoreResult<()> {
        *self.cache.write().await = TypedCache::new();
        Ok(())
    }

    async fn close(&self) -> StoreResult<()> {
        Ok(())
    }
}

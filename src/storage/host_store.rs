//! Host-persisted key-value store
//!
//! The host offers no partial-key writes, so every mutation here costs a
//! whole-state round trip: mutate the in-memory cache, encode all of it,
//! replace the host's blob. That trade is imposed by the host contract and is
//! kept visible rather than optimized away; one private `commit` step is the
//! single place the flush happens, so a host with real partial writes could be
//! substituted without touching the public contract.

use num_bigint::BigInt;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::StoreResult;
use crate::storage::adapter::KvStore;
use crate::storage::cache::TypedCache;
use crate::storage::cell::CacheCell;
use crate::storage::channel::StateChannel;
use crate::storage::codec;
use crate::storage::value::StoredValue;

/// Typed key-value store persisted through a host state channel
///
/// State is loaded lazily: the first accessor fetches and decodes the host
/// blob exactly once per generation, and every later call reuses that cache.
/// A write that returns `Ok` has already flushed the entire encoded state to
/// the host. `clear` persists an empty state and discards the loaded
/// generation, so the next access reloads from the host.
///
/// The host channel has no version token, and the host is assumed to run at
/// most one request invocation at a time against the persisted state. Two
/// live instances over one channel therefore race as last-write-wins: an
/// instance flushing a cache loaded before another instance's write silently
/// discards that write. This lost-update behavior comes with the host
/// contract and is deliberately not papered over.
///
/// # Examples
///
/// ```
/// use caligo_snap::storage::{HostKvStore, KvStore, MemoryChannel};
///
/// # tokio_test::block_on(async {
/// let store = HostKvStore::new(MemoryChannel::new());
/// store.put_string("spend_key", "0xabc").await.unwrap();
/// assert!(store.contains_key("spend_key").await.unwrap());
/// # });
/// ```
#[derive(Debug)]
pub struct HostKvStore<C: StateChannel> {
    channel: C,
    cell: RwLock<CacheCell>,
}

impl<C: StateChannel> HostKvStore<C> {
    /// Creates a store over the given channel; nothing is fetched until the
    /// first accessor runs
    pub fn new(channel: C) -> Self {
        Self {
            channel,
            cell: RwLock::new(CacheCell::new()),
        }
    }

    /// Encodes the full cache and replaces the host-held blob
    async fn commit(&self, cache: &TypedCache) -> StoreResult<()> {
        self.channel.set(codec::encode(cache)).await?;
        debug!(entries = cache.len(), "flushed state to host channel");
        Ok(())
    }

    async fn with_cache_read<T>(
        &self,
        f: impl FnOnce(&TypedCache) -> StoreResult<T>,
    ) -> StoreResult<T> {
        let cell = self.cell.read().await;
        let state = cell.get_or_load(&self.channel).await?;
        let cache = state.read().await;
        f(&cache)
    }

    /// Applies a mutation and commits; the cache write lock is held across
    /// the flush so mutate and commit cannot interleave with another write
    async fn with_cache_write<T>(&self, f: impl FnOnce(&mut TypedCache) -> T) -> StoreResult<T> {
        let cell = self.cell.read().await;
        let state = cell.get_or_load(&self.channel).await?;
        let mut cache = state.write().await;
        let out = f(&mut cache);
        self.commit(&cache).await?;
        Ok(out)
    }
}

impl<C: StateChannel> KvStore for HostKvStore<C> {
    async fn get_string(&self, key: &str) -> StoreResult<Option<String>> {
        self.with_cache_read(|cache| Ok(cache.get_string(key)?.map(str::to_string)))
            .await
    }

    async fn put_string(&self, key: &str, value: &str) -> StoreResult<()> {
        self.with_cache_write(|cache| cache.put_string(key, value))
            .await
    }

    async fn get_number(&self, key: &str) -> StoreResult<Option<f64>> {
        self.with_cache_read(|cache| cache.get_number(key)).await
    }

    async fn put_number(&self, key: &str, value: f64) -> StoreResult<()> {
        self.with_cache_write(|cache| cache.put_number(key, value))
            .await
    }

    async fn get_bigint(&self, key: &str) -> StoreResult<Option<BigInt>> {
        self.with_cache_read(|cache| Ok(cache.get_bigint(key)?.cloned()))
            .await
    }

    async fn put_bigint(&self, key: &str, value: BigInt) -> StoreResult<()> {
        self.with_cache_write(|cache| cache.put_bigint(key, value))
            .await
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.with_cache_write(|cache| {
            cache.remove(key);
        })
        .await
    }

    async fn contains_key(&self, key: &str) -> StoreResult<bool> {
        self.with_cache_read(|cache| Ok(cache.contains_key(key)))
            .await
    }

    async fn get_many(&self, keys: &[String]) -> StoreResult<Vec<(String, StoredValue)>> {
        self.with_cache_read(|cache| Ok(cache.get_many(keys))).await
    }

    async fn put_many(&self, entries: Vec<(String, StoredValue)>) -> StoreResult<()> {
        self.with_cache_write(|cache| cache.put_many(entries)).await
    }

    async fn remove_many(&self, keys: &[String]) -> StoreResult<()> {
        self.with_cache_write(|cache| cache.remove_many(keys)).await
    }

    async fn iter_range(&self, start: &str, end: &str) -> StoreResult<Vec<(String, StoredValue)>> {
        self.with_cache_read(|cache| Ok(cache.iter_range(start, end)))
            .await
    }

    async fn iter_prefix(&self, prefix: &str) -> StoreResult<Vec<(String, StoredValue)>> {
        self.with_cache_read(|cache| Ok(cache.iter_prefix(prefix)))
            .await
    }

    async fn clear(&self) -> StoreResult<()> {
        let mut cell = self.cell.write().await;
        self.channel.set(codec::encode(&TypedCache::new())).await?;
        *cell = CacheCell::new();
        info!("cleared persisted state");
        Ok(())
    }

    async fn close(&self) -> StoreResult<()> {
        // Nothing is held open; kept for lifecycle symmetry with stores that
        // do own resources.
        Ok(())
    }
}

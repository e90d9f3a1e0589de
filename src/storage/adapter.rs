//! Typed key-value store contract
//!
//! [`KvStore`] is the surface request handlers and the protocol SDK program
//! against. Two implementations ship with the crate:
//! [`HostKvStore`](crate::storage::HostKvStore) persists through the host's
//! whole-state channel, [`MemoryKvStore`](crate::storage::MemoryKvStore) keeps
//! everything in process memory.

use num_bigint::BigInt;

use crate::error::StoreResult;
use crate::storage::value::StoredValue;

/// Asynchronous typed key-value store
///
/// Keys are plain strings ordered lexicographically; each value carries one of
/// three logical types (string, number, big integer) and reading a key through
/// the wrong typed accessor is a
/// [`TypeMismatch`](crate::error::StoreError::TypeMismatch) error, never a
/// coercion. Every operation either yields its declared result or fails with
/// an explicit [`StoreError`](crate::error::StoreError); implementations do
/// not retry internally.
///
/// For durable implementations, a write operation that returns `Ok` has
/// already flushed the mutation to the backing host; batch writes flush once
/// for the whole batch.
///
/// # Examples
///
/// ```
/// use caligo_snap::storage::{KvStore, MemoryKvStore};
///
/// # tokio_test::block_on(async {
/// let store = MemoryKvStore::new();
/// store.put_string("greeting", "hello").await.unwrap();
/// assert_eq!(
///     store.get_string("greeting").await.unwrap(),
///     Some("hello".to_string())
/// );
/// # });
/// ```
pub trait KvStore: Send + Sync {
    /// Get the string stored under `key`
    fn get_string(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = StoreResult<Option<String>>> + Send;

    /// Store a string under `key`
    fn put_string(
        &self,
        key: &str,
        value: &str,
    ) -> impl std::future::Future<Output = StoreResult<()>> + Send;

    /// Get the number stored under `key`
    fn get_number(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = StoreResult<Option<f64>>> + Send;

    /// Store a number under `key`
    fn put_number(
        &self,
        key: &str,
        value: f64,
    ) -> impl std::future::Future<Output = StoreResult<()>> + Send;

    /// Get the big integer stored under `key`
    fn get_bigint(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = StoreResult<Option<BigInt>>> + Send;

    /// Store a big integer under `key`
    fn put_bigint(
        &self,
        key: &str,
        value: BigInt,
    ) -> impl std::future::Future<Output = StoreResult<()>> + Send;

    /// Remove `key`; removing an absent key is not an error
    fn remove(&self, key: &str) -> impl std::future::Future<Output = StoreResult<()>> + Send;

    /// Check whether `key` is present, whatever its tag
    fn contains_key(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = StoreResult<bool>> + Send;

    /// Get the pairs for the given keys in input order; absent keys are
    /// skipped
    fn get_many(
        &self,
        keys: &[String],
    ) -> impl std::future::Future<Output = StoreResult<Vec<(String, StoredValue)>>> + Send;

    /// Store every pair of the batch as one atomic in-memory application and
    /// one flush
    fn put_many(
        &self,
        entries: Vec<(String, StoredValue)>,
    ) -> impl std::future::Future<Output = StoreResult<()>> + Send;

    /// Remove every key of the batch as one application and one flush
    fn remove_many(
        &self,
        keys: &[String],
    ) -> impl std::future::Future<Output = StoreResult<()>> + Send;

    /// All pairs with `start <= key < end`, ascending; empty when
    /// `start >= end`
    fn iter_range(
        &self,
        start: &str,
        end: &str,
    ) -> impl std::future::Future<Output = StoreResult<Vec<(String, StoredValue)>>> + Send;

    /// All pairs whose key starts with `prefix`, ascending; matching is
    /// exact-substring-at-start
    fn iter_prefix(
        &self,
        prefix: &str,
    ) -> impl std::future::Future<Output = StoreResult<Vec<(String, StoredValue)>>> + Send;

    /// Drop every key and persist the empty state
    fn clear(&self) -> impl std::future::Future<Output = StoreResult<()>> + Send;

    /// Release the store; safe to call any number of times
    fn close(&self) -> impl std::future::Future<Output = StoreResult<()>> + Send;
}

//! In-memory ordered typed cache
//!
//! [`TypedCache`] is the working set every store implementation operates on: a
//! lexicographically ordered map from string keys to [`StoredValue`]s. It is
//! purely in-memory; durability is the persistence adapter's concern.
//!
//! Range and prefix scans iterate in strict ascending key order and
//! materialize their results, so a scan taken before a mutation is not
//! affected by it.

use std::collections::BTreeMap;
use std::ops::Bound;

use num_bigint::BigInt;

use crate::error::{StoreError, StoreResult};
use crate::storage::codec::{self, StateBlob};
use crate::storage::value::{StoredValue, ValueKind};

/// Ordered in-memory map from string keys to tagged values
///
/// Typed getters report a [`StoreError::TypeMismatch`] when the stored tag
/// differs from the accessor; an absent key is `Ok(None)`, never an error.
///
/// # Examples
///
/// ```
/// use caligo_snap::storage::TypedCache;
///
/// let mut cache = TypedCache::new();
/// cache.put("greeting", "hello");
/// cache.put("balance", 12.5);
///
/// assert_eq!(cache.get_string("greeting").unwrap(), Some("hello"));
/// assert_eq!(cache.get_number("balance").unwrap(), Some(12.5));
/// assert!(cache.get_number("greeting").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TypedCache {
    entries: BTreeMap<String, StoredValue>,
}

impl TypedCache {
    /// Creates an empty cache
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the cache holds no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the tagged value stored under `key`
    pub fn get(&self, key: &str) -> Option<&StoredValue> {
        self.entries.get(key)
    }

    /// Returns the string stored under `key`
    pub fn get_string(&self, key: &str) -> StoreResult<Option<&str>> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(StoredValue::String(value)) => Ok(Some(value)),
            Some(other) => Err(Self::mismatch(key, other, ValueKind::String)),
        }
    }

    /// Returns the number stored under `key`
    pub fn get_number(&self, key: &str) -> StoreResult<Option<f64>> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(StoredValue::Number(value)) => Ok(Some(*value)),
            Some(other) => Err(Self::mismatch(key, other, ValueKind::Number)),
        }
    }

    /// Returns the big integer stored under `key`
    pub fn get_bigint(&self, key: &str) -> StoreResult<Option<&BigInt>> {
        match self.entries.get(key) {
            None => Ok(None),
            Some(StoredValue::BigInt(value)) => Ok(Some(value)),
            Some(other) => Err(Self::mismatch(key, other, ValueKind::BigInt)),
        }
    }

    /// Inserts a tagged value under `key`, replacing any previous value
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<StoredValue>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Inserts a string value under `key`
    pub fn put_string(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.put(key, StoredValue::String(value.into()));
    }

    /// Inserts a number value under `key`
    pub fn put_number(&mut self, key: impl Into<String>, value: f64) {
        self.put(key, StoredValue::Number(value));
    }

    /// Inserts a big integer value under `key`
    pub fn put_bigint(&mut self, key: impl Into<String>, value: BigInt) {
        self.put(key, StoredValue::BigInt(value));
    }

    /// Removes `key`, returning its value if it was present
    pub fn remove(&mut self, key: &str) -> Option<StoredValue> {
        self.entries.remove(key)
    }

    /// Returns `true` if `key` is present, whatever its tag
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the (key, value) pairs for the given keys, in input order
    ///
    /// Absent keys are skipped rather than reported.
    pub fn get_many(&self, keys: &[String]) -> Vec<(String, StoredValue)> {
        keys.iter()
            .filter_map(|key| {
                self.entries
                    .get(key)
                    .map(|value| (key.clone(), value.clone()))
            })
            .collect()
    }

    /// Inserts every pair of the batch
    pub fn put_many(&mut self, entries: Vec<(String, StoredValue)>) {
        for (key, value) in entries {
            self.entries.insert(key, value);
        }
    }

    /// Removes every key of the batch
    pub fn remove_many(&mut self, keys: &[String]) {
        for key in keys {
            self.entries.remove(key);
        }
    }

    /// Returns all pairs with `start <= key < end`, ascending
    ///
    /// Empty when `start >= end`; the guard also keeps the underlying map's
    /// range call from panicking on an inverted range.
    pub fn iter_range(&self, start: &str, end: &str) -> Vec<(String, StoredValue)> {
        if start >= end {
            return Vec::new();
        }
        self.entries
            .range::<str, _>((Bound::Included(start), Bound::Excluded(end)))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Returns all pairs whose key starts with `prefix`, ascending
    ///
    /// Matching is exact-substring-at-start: `"ab:x"` does not match prefix
    /// `"a:"`. An empty prefix matches every key.
    pub fn iter_prefix(&self, prefix: &str) -> Vec<(String, StoredValue)> {
        self.entries
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(key, _)| key.starts_with(prefix))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Iterates over all pairs in ascending key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &StoredValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Encodes the full cache into a state blob
    pub fn dump(&self) -> StateBlob {
        codec::encode(self)
    }

    /// Replaces the cache contents with the decoded blob
    ///
    /// Prior contents are discarded even when they were never dumped.
    pub fn load_from_dump(&mut self, blob: StateBlob) -> StoreResult<()> {
        *self = codec::decode(blob)?;
        Ok(())
    }

    fn mismatch(key: &str, stored: &StoredValue, requested: ValueKind) -> StoreError {
        StoreError::TypeMismatch {
            key: key.to_string(),
            stored: stored.kind(),
            requested,
        }
    }
}

impl FromIterator<(String, StoredValue)> for TypedCache {
    fn from_iter<I: IntoIterator<Item = (String, StoredValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_cache() -> TypedCache {
        let mut cache = TypedCache::new();
        cache.put_string("a:1", "one");
        cache.put_string("a:2", "two");
        cache.put_string("ab:x", "cross");
        cache.put_number("b:1", 1.25);
        cache.put_bigint("c:1", BigInt::from(7));
        cache
    }

    #[test]
    fn test_typed_round_trip() {
        let mut cache = TypedCache::new();
        cache.put_string("s", "value");
        cache.put_number("n", -0.5);
        cache.put_bigint("i", BigInt::from(-99));

        assert_eq!(cache.get_string("s").unwrap(), Some("value"));
        assert_eq!(cache.get_number("n").unwrap(), Some(-0.5));
        assert_eq!(cache.get_bigint("i").unwrap(), Some(&BigInt::from(-99)));
    }

    #[test]
    fn test_absent_key_is_none() {
        let cache = TypedCache::new();
        assert_eq!(cache.get_string("missing").unwrap(), None);
        assert_eq!(cache.get_number("missing").unwrap(), None);
        assert_eq!(cache.get_bigint("missing").unwrap(), None);
        assert!(!cache.contains_key("missing"));
    }

    #[test]
    fn test_type_mismatch_is_error_not_coercion() {
        let mut cache = TypedCache::new();
        cache.put_string("k", "42");

        let err = cache.get_bigint("k").unwrap_err();
        match err {
            StoreError::TypeMismatch {
                key,
                stored,
                requested,
            } => {
                assert_eq!(key, "k");
                assert_eq!(stored, ValueKind::String);
                assert_eq!(requested, ValueKind::BigInt);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_put_replaces_value_and_tag() {
        let mut cache = TypedCache::new();
        cache.put_string("k", "text");
        cache.put_number("k", 3.0);

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get_number("k").unwrap(), Some(3.0));
        assert!(cache.get_string("k").is_err());
    }

    #[test]
    fn test_remove() {
        let mut cache = sample_cache();
        assert_eq!(
            cache.remove("a:1"),
            Some(StoredValue::String("one".to_string()))
        );
        assert_eq!(cache.remove("a:1"), None);
        assert!(!cache.contains_key("a:1"));
    }

    #[test]
    fn test_get_many_preserves_input_order_and_skips_absent() {
        let cache = sample_cache();
        let keys = vec![
            "c:1".to_string(),
            "missing".to_string(),
            "a:1".to_string(),
        ];
        let pairs = cache.get_many(&keys);
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].0, "c:1");
        assert_eq!(pairs[1].0, "a:1");
    }

    #[test]
    fn test_put_many_and_remove_many() {
        let mut cache = TypedCache::new();
        cache.put_many(vec![
            ("x".to_string(), StoredValue::from("1")),
            ("y".to_string(), StoredValue::from(2.0)),
        ]);
        assert_eq!(cache.len(), 2);

        cache.remove_many(&["x".to_string(), "absent".to_string()]);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains_key("y"));
    }

    #[test]
    fn test_range_is_ascending_and_half_open() {
        let cache = sample_cache();
        let pairs = cache.iter_range("a:1", "b:1");
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["a:1", "a:2", "ab:x"]);
    }

    #[test]
    fn test_range_empty_when_start_not_below_end() {
        let cache = sample_cache();
        assert!(cache.iter_range("b", "a").is_empty());
        assert!(cache.iter_range("a:1", "a:1").is_empty());
    }

    #[test]
    fn test_prefix_is_exact_substring_at_start() {
        let cache = sample_cache();
        let keys: Vec<String> = cache
            .iter_prefix("a:")
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["a:1", "a:2"]);
        assert!(!keys.contains(&"ab:x".to_string()));
    }

    #[test]
    fn test_prefix_includes_key_equal_to_prefix() {
        let mut cache = TypedCache::new();
        cache.put_string("leaf", "root");
        cache.put_string("leaf:0", "zero");
        let keys: Vec<String> = cache
            .iter_prefix("leaf")
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec!["leaf", "leaf:0"]);
    }

    #[test]
    fn test_empty_prefix_matches_all_keys() {
        let cache = sample_cache();
        assert_eq!(cache.iter_prefix("").len(), cache.len());
    }

    #[test]
    fn test_load_from_dump_discards_prior_contents() {
        let mut source = TypedCache::new();
        source.put_bigint("kept", BigInt::from(1));
        let blob = source.dump();

        let mut target = TypedCache::new();
        target.put_string("dropped", "stale");
        target.load_from_dump(blob).unwrap();

        assert!(!target.contains_key("dropped"));
        assert_eq!(target.get_bigint("kept").unwrap(), Some(&BigInt::from(1)));
    }
}

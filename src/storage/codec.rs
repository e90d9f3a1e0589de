//! State blob codec
//!
//! The host persists exactly one artifact: a flat JSON object mapping each key
//! to its tagged, string-encoded value. A blob produced by [`encode`] looks
//! like
//!
//! ```json
//! {
//!   "nonce": { "kind": "bigint", "value": "42" },
//!   "spend_key": { "kind": "string", "value": "0xabc..." }
//! }
//! ```
//!
//! Each [`StoredValue`] variant has one encode arm and one decode arm, so a
//! blob round-trips losslessly: `decode(encode(cache)) == cache`. Anything a
//! decode arm does not recognize is a [`StoreError::MalformedBlob`], never a
//! guessed type.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};
use crate::storage::cache::TypedCache;
use crate::storage::value::{StoredValue, ValueKind};

/// Wire form of one stored value: its type tag plus a string payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncodedValue {
    /// Logical type of the payload
    pub kind: ValueKind,
    /// String-encoded payload; numbers and big integers use their decimal form
    pub value: String,
}

impl EncodedValue {
    /// Encodes a stored value into its wire form
    pub fn encode(value: &StoredValue) -> Self {
        match value {
            StoredValue::String(value) => Self {
                kind: ValueKind::String,
                value: value.clone(),
            },
            StoredValue::Number(value) => Self {
                kind: ValueKind::Number,
                value: value.to_string(),
            },
            StoredValue::BigInt(value) => Self {
                kind: ValueKind::BigInt,
                value: value.to_string(),
            },
        }
    }

    /// Decodes the wire form back into a stored value
    ///
    /// A payload that does not parse under its declared tag is a
    /// [`StoreError::MalformedBlob`].
    pub fn decode(self) -> StoreResult<StoredValue> {
        match self.kind {
            ValueKind::String => Ok(StoredValue::String(self.value)),
            ValueKind::Number => {
                self.value
                    .parse::<f64>()
                    .map(StoredValue::Number)
                    .map_err(|e| StoreError::MalformedBlob {
                        reason: format!("number payload '{}': {}", self.value, e),
                    })
            }
            ValueKind::BigInt => {
                self.value
                    .parse::<num_bigint::BigInt>()
                    .map(StoredValue::BigInt)
                    .map_err(|e| StoreError::MalformedBlob {
                        reason: format!("bigint payload '{}': {}", self.value, e),
                    })
            }
        }
    }
}

/// Flat key-to-tagged-value snapshot exchanged with the host channel
///
/// This is the only externally durable artifact; every cache is a rebuildable
/// projection of some blob. Serializes transparently as the flat JSON object
/// shown in the module docs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateBlob(BTreeMap<String, EncodedValue>);

impl StateBlob {
    /// Creates an empty blob, the encoding of an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys in the blob
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the blob holds no keys
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the encoded value stored under `key`
    pub fn get(&self, key: &str) -> Option<&EncodedValue> {
        self.0.get(key)
    }

    /// Returns `true` if `key` is present in the blob
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Serializes the blob to the JSON document the host persists
    pub fn to_json(&self) -> StoreResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| StoreError::MalformedBlob {
            reason: format!("serialize state blob: {e}"),
        })
    }

    /// Deserializes a blob from the host's JSON document
    ///
    /// Syntax errors, unexpected shapes, and unrecognized type tags all fail
    /// as [`StoreError::MalformedBlob`].
    pub fn from_json(bytes: &[u8]) -> StoreResult<Self> {
        serde_json::from_slice(bytes).map_err(|e| StoreError::MalformedBlob {
            reason: format!("parse state blob: {e}"),
        })
    }
}

impl FromIterator<(String, EncodedValue)> for StateBlob {
    fn from_iter<I: IntoIterator<Item = (String, EncodedValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Encodes the full cache into a blob
pub fn encode(cache: &TypedCache) -> StateBlob {
    cache
        .iter()
        .map(|(key, value)| (key.to_string(), EncodedValue::encode(value)))
        .collect()
}

/// Decodes a blob into a fresh cache
pub fn decode(blob: StateBlob) -> StoreResult<TypedCache> {
    blob.0
        .into_iter()
        .map(|(key, encoded)| Ok((key, encoded.decode()?)))
        .collect()
}

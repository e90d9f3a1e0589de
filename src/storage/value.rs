//! Tagged values stored by the snap
//!
//! The host persists one flat JSON object, so every value carries an explicit
//! type tag in its encoded form. In memory the tag is the enum discriminant of
//! [`StoredValue`]; on the wire it is the [`ValueKind`] string.

use std::fmt;

use num_bigint::BigInt;
use serde::{Deserialize, Serialize};

/// Logical type tag of a stored value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// UTF-8 string
    String,
    /// Fixed-precision (IEEE 754 double) number
    Number,
    /// Arbitrary-precision signed integer
    BigInt,
}

impl ValueKind {
    /// Returns the wire name of this tag
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::BigInt => "bigint",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A value held by the store, together with its logical type
///
/// Exactly one logical type applies per stored value; reading a key through an
/// accessor of a different type is a type-mismatch error, never a coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum StoredValue {
    /// UTF-8 string value
    String(String),
    /// Fixed-precision number value
    Number(f64),
    /// Arbitrary-precision integer value
    BigInt(BigInt),
}

impl StoredValue {
    /// Returns the type tag of this value
    pub fn kind(&self) -> ValueKind {
        match self {
            StoredValue::String(_) => ValueKind::String,
            StoredValue::Number(_) => ValueKind::Number,
            StoredValue::BigInt(_) => ValueKind::BigInt,
        }
    }
}

impl From<String> for StoredValue {
    fn from(value: String) -> Self {
        StoredValue::String(value)
    }
}

impl From<&str> for StoredValue {
    fn from(value: &str) -> Self {
        StoredValue::String(value.to_string())
    }
}

impl From<f64> for StoredValue {
    fn from(value: f64) -> Self {
        StoredValue::Number(value)
    }
}

impl From<BigInt> for StoredValue {
    fn from(value: BigInt) -> Self {
        StoredValue::BigInt(value)
    }
}

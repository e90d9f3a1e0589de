//! Utility helpers for the Caligo snap library

/// Serde adapter carrying a [`num_bigint::BigInt`] through JSON as a decimal
/// string, the form the wallet runtime uses for arbitrary-precision fields.
///
/// Use with `#[serde(with = "crate::utils::bigint_string")]`.
pub(crate) mod bigint_string {
    use num_bigint::BigInt;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub(crate) fn serialize<S>(value: &BigInt, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_string())
    }

    pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<BigInt, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse::<BigInt>()
            .map_err(|e| de::Error::custom(format!("bigint '{raw}': {e}")))
    }
}

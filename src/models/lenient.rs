//! Forgiving deserializers for numeric payload fields.
//!
//! The API may send `null`, omit a field, or send a value of the wrong JSON type.
//! None of these fail the payload; the field simply decodes as absent.

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// Reads a JSON value as a finite float
pub fn finite_number(value: &Value) -> Option<f64> {
    value.as_f64().filter(|n| n.is_finite())
}

/// Absent, null, non-numeric and non-finite all decode as `None`
pub fn finite_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(finite_number))
}

/// Non-negative whole numbers, accepting integral floats such as `12.0`
pub fn count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(|v| {
        v.as_u64().or_else(|| {
            finite_number(v)
                .filter(|n| *n >= 0.0 && n.fract() == 0.0)
                .map(|n| n as u64)
        })
    }))
}

/// Signed whole numbers, accepting integral floats
pub fn integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(|v| {
        v.as_i64()
            .or_else(|| finite_number(v).filter(|n| n.fract() == 0.0).map(|n| n as i64))
    }))
}

/// `null` decodes as the type's default instead of failing
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

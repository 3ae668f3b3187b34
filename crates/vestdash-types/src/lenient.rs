//! Tolerant field decoders for the remote API.
//!
//! The API is backed by a SQL store and is inconsistent about how it encodes
//! ids and flags: ids arrive as JSON integers, integral floats or numeric
//! strings, and flags as booleans or `0`/`1`. These helpers are used with
//! `#[serde(deserialize_with)]`, or directly on decoded [`Value`]s.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawId {
    fn into_id<E: de::Error>(self) -> Result<i64, E> {
        match self {
            RawId::Int(id) => Ok(id),
            RawId::Float(value) => {
                integral(value).ok_or_else(|| E::custom(format!("invalid id: {value}")))
            }
            RawId::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid id: {text:?}"))),
        }
    }
}

/// `value` as an `i64` when it is a whole number in range.
fn integral(value: f64) -> Option<i64> {
    let in_range = (i64::MIN as f64..i64::MAX as f64).contains(&value);
    (in_range && value.fract() == 0.0).then_some(value as i64)
}

/// Read an id out of a decoded JSON value. Anything that is not a whole
/// number or a numeric string yields `None`.
#[must_use]
pub fn id_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(integral)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Decode a required id.
pub fn id<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    RawId::deserialize(deserializer)?.into_id()
}

/// Decode an optional id. `null` decodes to `None`.
pub fn opt_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RawId>::deserialize(deserializer)?
        .map(RawId::into_id)
        .transpose()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bool(bool),
    Int(i64),
}

/// Decode a flag given as `true`/`false` or `1`/`0`.
pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match RawFlag::deserialize(deserializer)? {
        RawFlag::Bool(value) => Ok(value),
        RawFlag::Int(value) => Ok(value != 0),
    }
}

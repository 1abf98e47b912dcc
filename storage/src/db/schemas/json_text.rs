//! Stores an open-ended JSON map as JSON text.
//!
//! SurrealDB drops `null` members of an object and wraps integers above `i64::MAX`, so the
//! maps clients fill freely (`metadata`, `socials`, `dsps`) are kept as text and come back
//! exactly as they were sent.
//!
//! Use with `#[serde(default, with = "json_text")]`.
use serde::{Deserialize, Deserializer, Serializer, de, ser};
use serde_json::{Map, Value};

/// # Errors
///
/// Fails if the map can't be rendered as JSON.
pub fn serialize<S: Serializer>(map: &Map<String, Value>, serializer: S) -> Result<S::Ok, S::Error> {
    let text = serde_json::to_string(map).map_err(ser::Error::custom)?;
    serializer.serialize_str(&text)
}

/// # Errors
///
/// Fails if the stored value is not a string holding a JSON object.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Map<String, Value>, D::Error> {
    let text = String::deserialize(deserializer)?;
    serde_json::from_str(&text).map_err(de::Error::custom)
}

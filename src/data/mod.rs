//! Core data models for the restaurant cache
//!
//! This module contains the restaurant record as served by the remote
//! endpoint, the lookup key used for id queries, and the in-memory filters
//! applied to a fetched collection.

pub mod filter;
pub mod source;

pub use source::{HttpSource, RestaurantSource, SourceConfig, SourceError, DEFAULT_PORT};

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Geographic position of a restaurant
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude coordinate
    pub lat: f64,
    /// Longitude coordinate
    pub lng: f64,
}

/// A single restaurant record
///
/// Field names follow the endpoint's JSON. Fields the model does not name
/// (address, operating hours, reviews, ...) are kept in `extra` and written
/// back unchanged. `photograph` is normalized: `null` is dropped and numbers
/// become strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    /// Unique identifier, primary key of the store
    pub id: i64,
    /// Display name
    pub name: String,
    /// Cuisine type, e.g. "Italian"
    pub cuisine_type: String,
    /// Neighborhood the restaurant is located in
    pub neighborhood: String,
    /// Image identifier; `None` falls back to the default image
    #[serde(
        default,
        deserialize_with = "photograph::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub photograph: Option<String>,
    /// Map position
    pub latlng: LatLng,
    /// Creation time, used to order the collection
    #[serde(rename = "createdAt", with = "created_at")]
    pub created_at: DateTime<Utc>,
    /// Remaining fields, preserved verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Key used to look up a restaurant by id
///
/// Ids arrive both as numbers (from the endpoint) and as text (from page
/// query strings or the command line). Text matches when it parses to the
/// same number after trimming whitespace; empty text never matches.
#[derive(Debug, Clone, PartialEq)]
pub enum RestaurantKey {
    /// A numeric id
    Number(i64),
    /// An id given as text, e.g. `"42"`
    Text(String),
}

impl RestaurantKey {
    /// Returns true if this key refers to the restaurant with `id`
    pub fn matches(&self, id: i64) -> bool {
        match self {
            RestaurantKey::Number(n) => *n == id,
            RestaurantKey::Text(text) => {
                let text = text.trim();
                match text.parse::<i64>() {
                    Ok(n) => n == id,
                    // Forms like "42.0" or "4.2e1"
                    Err(_) => text
                        .parse::<f64>()
                        .map(|n| n.fract() == 0.0 && n == id as f64)
                        .unwrap_or(false),
                }
            }
        }
    }
}

impl From<i64> for RestaurantKey {
    fn from(id: i64) -> Self {
        RestaurantKey::Number(id)
    }
}

impl From<&str> for RestaurantKey {
    fn from(id: &str) -> Self {
        RestaurantKey::Text(id.to_string())
    }
}

impl From<String> for RestaurantKey {
    fn from(id: String) -> Self {
        RestaurantKey::Text(id)
    }
}

impl fmt::Display for RestaurantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestaurantKey::Number(n) => write!(f, "{}", n),
            RestaurantKey::Text(text) => f.write_str(text),
        }
    }
}

/// `createdAt` is milliseconds since the epoch on the wire, though some
/// servers send RFC 3339 strings instead. Always written back as millis.
mod created_at {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Millis(i64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(value.timestamp_millis())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        match Wire::deserialize(deserializer)? {
            Wire::Millis(ms) => Utc
                .timestamp_millis_opt(ms)
                .single()
                .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {}", ms))),
            Wire::Text(text) => DateTime::parse_from_rfc3339(&text)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(de::Error::custom),
        }
    }
}

/// Photograph ids are usually strings but bare numbers show up too
mod photograph {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Wire {
        Text(String),
        Number(serde_json::Number),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        Ok(match Option::<Wire>::deserialize(deserializer)? {
            Some(Wire::Text(text)) => Some(text),
            Some(Wire::Number(n)) => Some(n.to_string()),
            None => None,
        })
    }
}

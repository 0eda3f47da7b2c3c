//! Decimal fields
//!
//! The server renders `DecimalField`s as strings (`"1.50"`) while some
//! hand-built responses use plain numbers. Both are accepted here and read
//! into `f64`; outgoing values are always numbers.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Raw {
    Number(f64),
    Text(String),
}

fn parse(raw: Raw) -> Result<f64, String> {
    match raw {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => {
            s.trim().parse::<f64>().map_err(|e| format!("invalid decimal {s:?}: {e}"))
        }
    }
}

/// Deserialize a required decimal.
///
/// # Errors
/// Fails when the value is neither a number nor a numeric string.
pub fn deserialize<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    parse(Raw::deserialize(deserializer)?).map_err(D::Error::custom)
}

/// Deserialize an optional decimal; `null`, a missing field and `""` map to `None`.
///
/// # Errors
/// Fails when a present value is neither a number nor a numeric string.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Raw>::deserialize(deserializer)? {
        None => Ok(None),
        Some(Raw::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(raw) => parse(raw).map(Some).map_err(D::Error::custom),
    }
}

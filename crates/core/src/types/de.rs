//! Lenient deserializers for backend payloads.
//!
//! The catalog backend is loosely typed: the same field can arrive as a
//! string, a number or `null` depending on the endpoint. These helpers
//! normalise those shapes at the edge so entity records stay plain.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Int(n) => n.to_string(),
            Self::Float(n) => n.to_string(),
            Self::Bool(b) => b.to_string(),
        }
    }

    fn into_f64(self) -> f64 {
        match self {
            Self::Text(s) => s.trim().parse().unwrap_or(0.0),
            #[allow(clippy::cast_precision_loss)] // ratings and counts are small
            Self::Int(n) => n as f64,
            Self::Float(n) => n,
            Self::Bool(b) => f64::from(u8::from(b)),
        }
    }

    fn into_i64(self) -> i64 {
        match self {
            Self::Text(s) => s.trim().parse().unwrap_or(0),
            #[allow(clippy::cast_possible_truncation)]
            Self::Float(n) => n as i64,
            Self::Int(n) => n,
            Self::Bool(b) => i64::from(b),
        }
    }
}

/// Deserialize a string that may arrive as a number or `null`.
///
/// `null` becomes the empty string.
///
/// # Errors
///
/// Returns an error if the value is an array or object.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?
        .map(Scalar::into_string)
        .unwrap_or_default())
}

/// Deserialize a number that may arrive as a numeric string or `null`.
///
/// Unparseable strings and `null` become `0.0`.
///
/// # Errors
///
/// Returns an error if the value is an array or object.
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map_or(0.0, Scalar::into_f64))
}

/// Deserialize an integer that may arrive as a numeric string, bool or `null`.
///
/// # Errors
///
/// Returns an error if the value is an array or object.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map_or(0, Scalar::into_i64))
}

/// Deserialize a list of strings that may be `null`.
///
/// # Errors
///
/// Returns an error if the value is neither `null` nor an array of scalars.
pub fn lenient_string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Option<Scalar>>>::deserialize(deserializer)?
        .unwrap_or_default()
        .into_iter()
        .flatten()
        .map(Scalar::into_string)
        .collect())
}

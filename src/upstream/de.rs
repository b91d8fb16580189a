//! Lenient field deserializers for upstream JSON.
//!
//! The upstream API is loose about types: identifiers and prizes show up as
//! numbers or strings, lists sometimes as a single comma-separated string,
//! and "missing" as null, "" or 0. A bad field must not sink the whole feed,
//! so these collapse anything unusable to `None` / empty.

use serde::{Deserialize, Deserializer};
use serde_json::{Number, Value};

/// String, number, or bool as an optional string. Empty strings and zero count as absent.
pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => Some(number_text(&n)),
        Some(Value::Bool(b)) => Some(if b { "Yes" } else { "No" }.to_string()),
        _ => None,
    })
}

/// Array of strings, or a single comma-separated string.
pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                Value::Number(n) => Some(number_text(&n)),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => s.split(',').map(|part| part.to_string()).collect(),
        _ => Vec::new(),
    };

    Ok(values
        .into_iter()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect())
}

/// Integral floats print without a fractional part (`1500.0` as `1500`).
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() => f.to_string(),
        _ => n.to_string(),
    }
}

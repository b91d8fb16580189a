//! Raw query-string parsing.
//!
//! Accepts the shapes browsers and feed readers actually send:
//! - `key=value` (single value)
//! - `key=a&key=b` (repeated keys collapse into an array)
//! - `key[]=a` and `key[0]=a` (bracket array syntax)
//! - `key[name]=a` (object syntax), kept as [`RawValue::Nested`] so the
//!   normalizer can reject it when the key is one it cares about

use std::collections::HashMap;

/// A value as it arrived on the wire, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Single(String),
    Multi(Vec<String>),
    /// Object-shaped parameter; never valid for this endpoint.
    Nested,
}

impl RawValue {
    fn push(&mut self, value: String) {
        match self {
            RawValue::Single(first) => {
                *self = RawValue::Multi(vec![std::mem::take(first), value]);
            }
            RawValue::Multi(values) => values.push(value),
            RawValue::Nested => {}
        }
    }
}

/// Query parameters keyed by base name.
pub type RawQuery = HashMap<String, RawValue>;

/// Parse a URL query string (without the leading `?`).
pub fn parse_query(query: &str) -> RawQuery {
    let mut raw = RawQuery::new();

    for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
        let value = value.into_owned();
        match split_brackets(&key) {
            KeyShape::Plain(name) => match raw.get_mut(name) {
                Some(existing) => existing.push(value),
                None => {
                    raw.insert(name.to_string(), RawValue::Single(value));
                }
            },
            KeyShape::Indexed(name) => match raw.get_mut(name) {
                Some(existing) => existing.push(value),
                None => {
                    raw.insert(name.to_string(), RawValue::Multi(vec![value]));
                }
            },
            KeyShape::Nested(name) => {
                raw.insert(name.to_string(), RawValue::Nested);
            }
        }
    }

    raw
}

enum KeyShape<'a> {
    Plain(&'a str),
    Indexed(&'a str),
    Nested(&'a str),
}

fn split_brackets(key: &str) -> KeyShape<'_> {
    let Some(open) = key.find('[') else {
        return KeyShape::Plain(key);
    };
    if open == 0 || !key.ends_with(']') {
        return KeyShape::Plain(key);
    }

    let name = &key[..open];
    let inner = &key[open + 1..key.len() - 1];
    if inner.is_empty() || inner.bytes().all(|b| b.is_ascii_digit()) {
        KeyShape::Indexed(name)
    } else {
        KeyShape::Nested(name)
    }
}

//! Query normalization: whitelisting, defaulting, category precedence.
//!
//! `track` and `contestType` are legacy synonyms of `type`. A value may come
//! in on any of the three; `type` wins over `track`, which wins over
//! `contestType`, and with none present the category is `all`. The aliases
//! never survive normalization.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::QueryConfig;
use crate::query::parse::{RawQuery, RawValue};
use crate::query::QueryError;

pub const CATEGORY: &str = "type";
pub const LIST: &str = "list";
pub const CATEGORY_ALIASES: [&str; 2] = ["track", "contestType"];
pub const ALL_CATEGORIES: &str = "all";
pub const DATA_CATEGORY: &str = "data";
pub const DEFAULT_LIST: &str = "active";

/// A normalized parameter value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum QueryValue {
    Single(String),
    Multi(Vec<String>),
}

impl QueryValue {
    fn is_empty(&self) -> bool {
        match self {
            QueryValue::Single(v) => v.is_empty(),
            QueryValue::Multi(values) => values.is_empty(),
        }
    }

    /// The value as a single string, if it is one.
    pub fn as_single(&self) -> Option<&str> {
        match self {
            QueryValue::Single(v) => Some(v),
            QueryValue::Multi(_) => None,
        }
    }

    /// Every value, in order.
    pub fn values(&self) -> Vec<&str> {
        match self {
            QueryValue::Single(v) => vec![v.as_str()],
            QueryValue::Multi(values) => values.iter().map(String::as_str).collect(),
        }
    }
}

/// Whitelisted, defaulted, precedence-resolved request parameters.
///
/// Always holds exactly one `type` and one single-valued `list`. Keys are
/// kept sorted so [`NormalizedQuery::cache_key`] is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NormalizedQuery {
    params: BTreeMap<String, QueryValue>,
}

impl NormalizedQuery {
    /// Build a normalized query from raw parameters.
    ///
    /// Fails only when a whitelisted parameter arrives object-shaped.
    pub fn normalize(raw: &RawQuery, config: &QueryConfig) -> Result<Self, QueryError> {
        let mut params = BTreeMap::new();

        for name in &config.supported_params {
            let value = match raw.get(name) {
                None => continue,
                Some(RawValue::Nested) => return Err(QueryError::Malformed(name.clone())),
                Some(RawValue::Single(v)) => QueryValue::Single(v.clone()),
                Some(RawValue::Multi(values)) => QueryValue::Multi(values.clone()),
            };
            params.insert(name.clone(), value);
        }

        let category = std::iter::once(CATEGORY)
            .chain(CATEGORY_ALIASES)
            .filter_map(|key| params.get(key))
            .find(|value| !value.is_empty())
            .cloned()
            .unwrap_or_else(|| QueryValue::Single(ALL_CATEGORIES.to_string()));
        for alias in CATEGORY_ALIASES {
            params.remove(alias);
        }
        params.insert(CATEGORY.to_string(), category);

        let list = match params.remove(LIST) {
            Some(QueryValue::Multi(values)) => values.into_iter().next().unwrap_or_default(),
            Some(QueryValue::Single(value)) => value,
            None => String::new(),
        };
        let list = if list.is_empty() { DEFAULT_LIST.to_string() } else { list };
        params.insert(LIST.to_string(), QueryValue::Single(list));

        Ok(Self { params })
    }

    /// The resolved category value.
    pub fn category(&self) -> &QueryValue {
        // Always inserted by normalize().
        &self.params[CATEGORY]
    }

    /// The resolved status list.
    pub fn list(&self) -> &str {
        self.params
            .get(LIST)
            .and_then(QueryValue::as_single)
            .unwrap_or(DEFAULT_LIST)
    }

    /// True when the request asks for every category.
    pub fn is_all_categories(&self) -> bool {
        matches!(self.category(), QueryValue::Single(c) if c.is_empty() || c == ALL_CATEGORIES)
    }

    pub fn get(&self, name: &str) -> Option<&QueryValue> {
        self.params.get(name)
    }

    /// Parameters to forward to the standard challenges endpoint: everything but `list`.
    pub fn filters(&self) -> Vec<(String, String)> {
        self.params
            .iter()
            .filter(|(name, _)| name.as_str() != LIST)
            .flat_map(|(name, value)| {
                value
                    .values()
                    .into_iter()
                    .map(move |v| (name.clone(), v.to_string()))
            })
            .collect()
    }

    /// Deterministic serialization used as the feed cache key.
    pub fn cache_key(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("{:?}", self.params))
    }

    /// Check category and list against the configured accepted values.
    pub fn validate(&self, config: &QueryConfig) -> Result<(), QueryError> {
        if !self.is_all_categories() {
            match self.category() {
                QueryValue::Single(c) if config.valid_types.iter().any(|t| t == c) => {}
                other => return Err(QueryError::InvalidCategory(other.values().join(","))),
            }
        }
        if !config.valid_lists.iter().any(|l| l == self.list()) {
            return Err(QueryError::InvalidList(self.list().to_string()));
        }
        Ok(())
    }
}

//! Time-bounded response cache.
//!
//! Holds two kinds of payload in one store:
//! - rendered feed documents, keyed by the normalized request
//! - raw upstream JSON bodies, keyed by upstream URL + query
//!
//! Keys are namespaced by [`CacheKey`] so the two can never collide.
//!
//! # Design Decisions
//! - TTL is checked on read (lazy expiry); nothing sweeps in the background
//! - Put always overwrites, last write wins
//! - Safe for concurrent get/put from any task (DashMap shards)
//! - The clock is injected so tests control time

pub mod clock;

use dashmap::DashMap;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub use clock::{Clock, ManualClock, SystemClock};
use crate::observability::metrics;

/// Namespaced cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Rendered feed for a serialized normalized query.
    Feed(String),
    /// Upstream response for a URL with its query string.
    Upstream(String),
}

impl CacheKey {
    fn namespace(&self) -> &'static str {
        match self {
            CacheKey::Feed(_) => "feed",
            CacheKey::Upstream(_) => "upstream",
        }
    }
}

/// A cached value.
#[derive(Debug, Clone)]
pub enum Payload {
    /// Rendered RSS document.
    Document(Arc<str>),
    /// Decoded upstream JSON body.
    Json(Arc<Value>),
}

impl Payload {
    pub fn into_document(self) -> Option<Arc<str>> {
        match self {
            Payload::Document(doc) => Some(doc),
            Payload::Json(_) => None,
        }
    }

    pub fn into_json(self) -> Option<Arc<Value>> {
        match self {
            Payload::Json(json) => Some(json),
            Payload::Document(_) => None,
        }
    }
}

#[derive(Debug)]
struct CacheEntry {
    payload: Payload,
    created_at: Instant,
}

/// Shared response cache. Cloning shares the underlying store.
#[derive(Debug, Clone)]
pub struct ResponseCache {
    inner: Arc<DashMap<CacheKey, CacheEntry>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    /// Create an empty cache using the system clock.
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    /// Create an empty cache with an explicit time source.
    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: Arc::new(DashMap::new()),
            ttl,
            clock,
        }
    }

    /// Look up a live entry.
    ///
    /// Returns `None` when the key is unknown or its entry is older than the TTL.
    /// Expired entries stay in the map until overwritten.
    pub fn get(&self, key: &CacheKey) -> Option<Payload> {
        let now = self.clock.now();
        let hit = self.inner.get(key).and_then(|entry| {
            if now.saturating_duration_since(entry.created_at) > self.ttl {
                tracing::info!(key = ?key, "Cached entry expired, forcing refresh");
                None
            } else {
                Some(entry.payload.clone())
            }
        });

        metrics::record_cache_lookup(key.namespace(), hit.is_some());
        hit
    }

    /// Store a payload stamped with the current time, replacing any previous entry.
    pub fn put(&self, key: CacheKey, payload: Payload) {
        let created_at = self.clock.now();
        tracing::debug!(key = ?key, ttl_secs = self.ttl.as_secs(), "Caching payload");
        self.inner.insert(key, CacheEntry { payload, created_at });
    }

    /// Number of stored entries, live or expired.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

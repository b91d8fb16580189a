//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the feed
//! service. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the feed service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FeedServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Response cache settings.
    pub cache: CacheConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Upstream challenge API settings.
    pub upstream: UpstreamConfig,

    /// Feed-level metadata and rendering options.
    pub feed: FeedConfig,

    /// Query whitelist and accepted values.
    pub query: QueryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3333").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3333".to_string(),
        }
    }
}

/// Response cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Maximum age of a cache entry in minutes.
    pub ttl_minutes: u64,
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_minutes.saturating_mul(60))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { ttl_minutes: 5 }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Timeout for a single upstream API call in milliseconds.
    pub upstream_ms: u64,

    /// Deadline for answering an inbound request in milliseconds.
    /// Past this point the client gets 202 and the work finishes in the background.
    pub deadline_ms: u64,
}

impl TimeoutConfig {
    pub fn upstream(&self) -> Duration {
        Duration::from_millis(self.upstream_ms)
    }

    pub fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            upstream_ms: 20_000,
            deadline_ms: 25_000,
        }
    }
}

/// Upstream challenge API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the API host (e.g., "http://api.topcoder.com").
    pub api_host: String,

    /// Page size requested from the list endpoints.
    /// Large enough to fetch the full set in a single call.
    pub page_size: u32,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_host: "http://api.topcoder.com".to_string(),
            page_size: 51,
        }
    }
}

/// Feed metadata and rendering options.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeedConfig {
    /// Channel title.
    pub title: String,

    /// Channel description.
    pub description: String,

    /// Public URL of this feed (emitted as the atom self link).
    pub feed_url: String,

    /// Site the feed belongs to (channel link).
    pub site_url: String,

    /// Visible character budget for the requirements text in item descriptions.
    pub description_max_chars: usize,

    /// Prefix for standard challenge links; the challenge id is appended.
    pub challenge_link_base: String,

    /// Problem statement page for marathon matches; round and problem ids are appended.
    pub marathon_link_base: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            title: "Topcoder Challenges".to_string(),
            description: "Open challenges on Topcoder".to_string(),
            feed_url: "http://localhost:3333/challenges/feed".to_string(),
            site_url: "https://www.topcoder.com/".to_string(),
            description_max_chars: 500,
            challenge_link_base: "https://www.topcoder.com/challenge-details/".to_string(),
            marathon_link_base:
                "https://community.topcoder.com/longcontest/?module=ViewProblemStatement"
                    .to_string(),
        }
    }
}

/// Query parameter whitelist and accepted enumeration values.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct QueryConfig {
    /// Parameters kept by the normalizer. Anything else is dropped.
    pub supported_params: Vec<String>,

    /// Accepted challenge categories. "all" is handled separately and is not listed here.
    pub valid_types: Vec<String>,

    /// Accepted status lists.
    pub valid_lists: Vec<String>,
}

impl Default for QueryConfig {
    fn default() -> Self {
        let owned = |values: &[&str]| values.iter().map(|v| v.to_string()).collect();
        Self {
            supported_params: owned(&[
                "type",
                "track",
                "contestType",
                "list",
                "challengeType",
                "platforms",
                "technologies",
            ]),
            valid_types: owned(&["design", "develop", "data"]),
            valid_lists: owned(&["open", "active", "past", "upcoming"]),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level used when RUST_LOG is not set (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

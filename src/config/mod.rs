//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → loader.rs (environment overrides: PORT, CACHE_TIME, FEED_TITLE, ...)
//!     → validation.rs (semantic checks)
//!     → FeedServiceConfig (validated, immutable)
//!     → shared via Arc / cloned sections to all subsystems
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load, ConfigError};
pub use schema::{
    CacheConfig, FeedConfig, FeedServiceConfig, ListenerConfig, ObservabilityConfig, QueryConfig,
    TimeoutConfig, UpstreamConfig,
};

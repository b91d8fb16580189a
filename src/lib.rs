//! Challenge feed service library.
//!
//! Serves open challenges from an upstream challenge API as an RSS 2.0 feed
//! at `GET /challenges/feed`, with a shared TTL cache in front of both the
//! rendered feeds and the upstream responses.

// Request path
pub mod aggregate;
pub mod feed;
pub mod http;
pub mod query;
pub mod upstream;

// Shared state
pub mod cache;
pub mod config;
pub mod error;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::FeedServiceConfig;
pub use error::FeedError;
pub use http::FeedServer;
pub use lifecycle::Shutdown;

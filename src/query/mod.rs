//! Inbound query handling.
//!
//! # Data Flow
//! ```text
//! raw query string
//!     → parse.rs (decode, group repeated and bracketed keys)
//!     → normalize.rs (whitelist, category precedence, list default)
//!     → NormalizedQuery (immutable; cache key + aggregator input)
//! ```

pub mod normalize;
pub mod parse;

use thiserror::Error;

pub use normalize::{NormalizedQuery, QueryValue};
pub use parse::{parse_query, RawQuery, RawValue};

/// Reasons a request's parameters are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// A whitelisted parameter arrived with an object shape.
    #[error("malformed value for parameter '{0}'")]
    Malformed(String),

    #[error("unsupported challenge type '{0}'")]
    InvalidCategory(String),

    #[error("unsupported list '{0}'")]
    InvalidList(String),
}

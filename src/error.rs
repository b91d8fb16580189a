//! Crate-level error type for feed requests.
//!
//! The HTTP mapping lives in `http::response`; the variants here carry the
//! cause for logging and never reach the client verbatim.

use thiserror::Error;

use crate::query::QueryError;
use crate::upstream::UpstreamError;

/// Why a feed request did not produce a document.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Parameters failed normalization or validation.
    #[error("invalid query: {0}")]
    InvalidQuery(#[from] QueryError),

    /// An upstream call failed, including any single detail fetch.
    #[error("upstream failure: {0}")]
    Upstream(#[from] UpstreamError),

    /// The request deadline passed before the feed was ready.
    #[error("feed not ready within {0:?}")]
    DeadlineExceeded(std::time::Duration),

    /// The feed pipeline ended without a result.
    #[error("internal error: {0}")]
    Internal(String),
}

impl FeedError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            FeedError::InvalidQuery(_) => "invalid_query",
            FeedError::Upstream(_) => "upstream",
            FeedError::DeadlineExceeded(_) => "deadline",
            FeedError::Internal(_) => "internal",
        }
    }
}

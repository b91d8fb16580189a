//! Upstream challenge API access.
//!
//! # Data Flow
//! ```text
//! Aggregator
//!     → client.rs (cache lookup per URL + query)
//!         → [miss] GET {api_host}/v2/challenges/{list}
//!             → GET {api_host}/v2/challenges/{id}   (one per summary, concurrent)
//!         → [miss] GET {api_host}/v2/data/marathon/challenges?listType={list}
//!     → types.rs (wire structs → ChallengeRecord)
//! ```
//!
//! # Design Decisions
//! - Every call has a timeout (reqwest client-level)
//! - No automatic retries; failures surface to the handler as 500
//! - Only successful bodies are cached

pub mod client;
pub mod de;
pub mod types;

pub use client::UpstreamClient;
pub use types::{UpstreamError, UpstreamResult};

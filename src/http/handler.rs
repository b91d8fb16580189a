//! Feed request handling.
//!
//! # Data Flow
//! ```text
//! Received
//!     → Normalizing (whitelist, precedence, validation) ──invalid──→ 400
//!     → cache lookup ──hit──→ 200
//!     → [miss] spawn pipeline: Fetching → Rendering → cache put → send
//!     → wait for pipeline or deadline
//!         ├─ pipeline first: 200 or 500
//!         └─ deadline first: 202; pipeline keeps running and fills the cache
//! ```
//!
//! # Design Decisions
//! - The pipeline runs as its own task, so neither the deadline nor a client
//!   disconnect cancels upstream calls or the cache write
//! - A oneshot channel is the single delivery path: the pipeline sends once,
//!   and if the receiver is gone the result is only logged
//! - The document is cached before it is sent

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;

use crate::aggregate::{Aggregator, FetchPlan};
use crate::cache::{CacheKey, Payload, ResponseCache};
use crate::config::QueryConfig;
use crate::error::FeedError;
use crate::feed::FeedRenderer;
use crate::http::response::FeedDocument;
use crate::observability::metrics;
use crate::query::{NormalizedQuery, RawQuery};

/// Serves feed requests. Cloning shares the underlying components.
#[derive(Clone)]
pub struct FeedHandler {
    inner: Arc<Inner>,
}

struct Inner {
    cache: ResponseCache,
    aggregator: Aggregator,
    renderer: FeedRenderer,
    query_config: QueryConfig,
    deadline: Duration,
}

impl FeedHandler {
    pub fn new(
        cache: ResponseCache,
        aggregator: Aggregator,
        renderer: FeedRenderer,
        query_config: QueryConfig,
        deadline: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                cache,
                aggregator,
                renderer,
                query_config,
                deadline,
            }),
        }
    }

    /// Produce the feed for a request, within the configured deadline.
    pub async fn handle(&self, raw: &RawQuery, request_id: &str) -> Result<FeedDocument, FeedError> {
        let inner = &self.inner;

        let query = NormalizedQuery::normalize(raw, &inner.query_config)?;
        let plan = FetchPlan::for_query(&query, &inner.query_config)?;
        let key = CacheKey::Feed(query.cache_key());

        if let Some(document) = inner.cache.get(&key).and_then(Payload::into_document) {
            tracing::debug!(request_id = %request_id, query = %query.cache_key(), "Feed served from cache");
            return Ok(FeedDocument(document));
        }

        tracing::info!(
            request_id = %request_id,
            query = %query.cache_key(),
            plan = plan.label(),
            "Building feed"
        );

        let (tx, rx) = oneshot::channel();
        let pipeline = self.clone();
        let id = request_id.to_string();
        tokio::spawn(async move {
            let result = pipeline.build(&plan, key).await;
            if let Err(unsent) = tx.send(result) {
                metrics::record_late_completion();
                match unsent {
                    Ok(_) => tracing::info!(request_id = %id, "Feed completed after response was sent; cached"),
                    Err(e) => tracing::warn!(request_id = %id, error = %e, "Feed failed after response was sent"),
                }
            }
        });

        match tokio::time::timeout(inner.deadline, rx).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(FeedError::Internal("feed pipeline ended without a result".into())),
            Err(_) => Err(FeedError::DeadlineExceeded(inner.deadline)),
        }
    }

    /// Fetch, render, and cache one feed.
    async fn build(&self, plan: &FetchPlan, key: CacheKey) -> Result<FeedDocument, FeedError> {
        let records = self.inner.aggregator.fetch(plan).await?;
        let document: Arc<str> = Arc::from(self.inner.renderer.render(&records));

        self.inner.cache.put(key, Payload::Document(document.clone()));
        tracing::debug!(items = records.len(), "Feed rendered and cached");

        Ok(FeedDocument(document))
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.inner.cache
    }
}

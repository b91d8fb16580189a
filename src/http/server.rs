//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the shared components (cache, upstream client, aggregator, renderer)
//! - Create the Axum router: `GET /challenges/feed`, `GET /health`
//! - Wire up middleware (request id, tracing)
//! - Serve on a listener until shutdown is signalled

use std::time::Instant;

use axum::{
    extract::{RawQuery as QueryString, State},
    http::HeaderMap,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::aggregate::Aggregator;
use crate::cache::ResponseCache;
use crate::config::FeedServiceConfig;
use crate::error::FeedError;
use crate::feed::FeedRenderer;
use crate::http::handler::FeedHandler;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::observability::metrics;
use crate::query::parse_query;
use crate::upstream::UpstreamClient;

pub const FEED_PATH: &str = "/challenges/feed";
pub const HEALTH_PATH: &str = "/health";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub feed: FeedHandler,
}

/// HTTP server for the challenge feed.
pub struct FeedServer {
    router: Router,
    config: FeedServiceConfig,
}

impl FeedServer {
    /// Create a server with a fresh cache sized by the configured TTL.
    pub fn new(config: FeedServiceConfig) -> Result<Self, reqwest::Error> {
        let cache = ResponseCache::new(config.cache.ttl());
        Self::with_cache(config, cache)
    }

    /// Create a server around an existing cache.
    pub fn with_cache(config: FeedServiceConfig, cache: ResponseCache) -> Result<Self, reqwest::Error> {
        let client = UpstreamClient::new(&config.upstream, config.timeouts.upstream(), cache.clone())?;
        let feed = FeedHandler::new(
            cache,
            Aggregator::new(client),
            FeedRenderer::new(config.feed.clone()),
            config.query.clone(),
            config.timeouts.deadline(),
        );

        let router = Self::build_router(AppState { feed });
        Ok(Self { router, config })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(state: AppState) -> Router {
        Router::new()
            .route(FEED_PATH, get(feed_handler))
            .route(HEALTH_PATH, get(health_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id_layer())
                    .layer(TraceLayer::new_for_http())
                    .layer(propagate_request_id_layer()),
            )
    }

    /// The configured router, for driving requests without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve until a shutdown signal arrives on `shutdown`.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            api_host = %self.config.upstream.api_host,
            cache_ttl_minutes = self.config.cache.ttl_minutes,
            deadline_ms = self.config.timeouts.deadline_ms,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining connections");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// `GET /challenges/feed`
async fn feed_handler(
    State(state): State<AppState>,
    QueryString(query): QueryString,
    headers: HeaderMap,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers);
    let raw = parse_query(query.as_deref().unwrap_or_default());

    let response = match state.feed.handle(&raw, &request_id).await {
        Ok(document) => document.into_response(),
        Err(e) => {
            log_failure(&request_id, query.as_deref(), &e);
            e.into_response()
        }
    };

    metrics::record_request(response.status().as_u16(), start);
    response
}

fn log_failure(request_id: &str, query: Option<&str>, error: &FeedError) {
    let query = query.unwrap_or_default();
    match error {
        FeedError::InvalidQuery(_) => {
            tracing::warn!(request_id = %request_id, query = %query, error = %error, "Rejected feed request")
        }
        FeedError::DeadlineExceeded(_) => {
            tracing::warn!(request_id = %request_id, query = %query, error = %error, "Feed deadline exceeded, answering 202")
        }
        FeedError::Upstream(e) => {
            tracing::error!(request_id = %request_id, query = %query, url = %e.url(), error = %e, "Feed build failed")
        }
        FeedError::Internal(_) => {
            tracing::error!(request_id = %request_id, query = %query, error = %error, "Feed build failed")
        }
    }
}

/// `GET /health`
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "cache_entries": state.feed.cache().len(),
    }))
}

//! Shared utilities for integration testing.
//!
//! Starts a programmable mock of the upstream challenge API and the feed
//! service itself, both on ephemeral ports.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU16, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio::net::TcpListener;

use challenge_feed::config::FeedServiceConfig;
use challenge_feed::{FeedServer, Shutdown};

pub const CHALLENGE_IDS: [u64; 2] = [30041234, 30041235];

/// Behaviour switches and call records for the mock upstream.
#[derive(Default)]
pub struct MockState {
    pub list_calls: AtomicUsize,
    pub detail_calls: AtomicUsize,
    pub data_science_calls: AtomicUsize,
    /// Delay before every response, in milliseconds.
    pub delay_ms: AtomicU64,
    /// Status every endpoint answers with; 0 means normal behaviour.
    pub fail_status: AtomicU16,
    /// Fail detail lookups only.
    pub fail_details: AtomicBool,
    pub list_queries: Mutex<Vec<String>>,
    pub data_science_queries: Mutex<Vec<String>>,
}

impl MockState {
    pub fn total_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
            + self.detail_calls.load(Ordering::SeqCst)
            + self.data_science_calls.load(Ordering::SeqCst)
    }

    pub fn set_delay(&self, delay: Duration) {
        self.delay_ms.store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn set_fail_status(&self, status: u16) {
        self.fail_status.store(status, Ordering::SeqCst);
    }

    async fn pause(&self) {
        let delay = self.delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
    }

    fn forced_failure(&self) -> Option<Response> {
        match self.fail_status.load(Ordering::SeqCst) {
            0 => None,
            status => Some(
                (
                    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
                    "upstream unavailable",
                )
                    .into_response(),
            ),
        }
    }
}

/// A running mock upstream.
pub struct MockUpstream {
    pub addr: SocketAddr,
    pub state: Arc<MockState>,
}

impl MockUpstream {
    pub fn host(&self) -> String {
        format!("http://{}", self.addr)
    }
}

/// Start the mock upstream challenge API.
pub async fn start_mock_upstream() -> MockUpstream {
    let state = Arc::new(MockState::default());
    let app = Router::new()
        .route("/v2/challenges/{segment}", get(challenges))
        .route("/v2/data/marathon/challenges", get(marathon_challenges))
        .with_state(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, state }
}

/// List endpoint (`/v2/challenges/{list}`) and detail endpoint (`/v2/challenges/{id}`).
async fn challenges(
    State(state): State<Arc<MockState>>,
    Path(segment): Path<String>,
    RawQuery(query): RawQuery,
) -> Response {
    match segment.parse::<u64>() {
        Ok(id) => {
            state.detail_calls.fetch_add(1, Ordering::SeqCst);
            state.pause().await;
            if let Some(failure) = state.forced_failure() {
                return failure;
            }
            if state.fail_details.load(Ordering::SeqCst) {
                return (StatusCode::NOT_FOUND, "no such challenge").into_response();
            }
            Json(json!({
                "challengeId": id,
                "detailedRequirements": format!("<p>Requirements for {}</p><script>alert(1)</script>", id),
                "platforms": ["Linux"],
                "technologies": ["Rust", "Postgres"],
                "totalPrize": 1500,
                "firstPlacePrize": 1000,
                "registrationEndDate": "2014-05-30T09:00:00.000-0400"
            }))
            .into_response()
        }
        Err(_) => {
            state.list_calls.fetch_add(1, Ordering::SeqCst);
            state
                .list_queries
                .lock()
                .unwrap()
                .push(format!("{}?{}", segment, query.unwrap_or_default()));
            state.pause().await;
            if let Some(failure) = state.forced_failure() {
                return failure;
            }
            Json(json!({
                "total": 2,
                "data": [
                    {
                        "challengeId": CHALLENGE_IDS[0],
                        "challengeName": "Build the API",
                        "challengeCommunity": "develop",
                        "challengeType": "Code",
                        "registrationStartDate": "2014-05-20T09:00:00.000-0400"
                    },
                    {
                        "challengeId": CHALLENGE_IDS[1],
                        "challengeName": "Design the logo",
                        "challengeCommunity": "design",
                        "registrationStartDate": "2014-05-22T09:00:00.000-0400"
                    }
                ]
            }))
            .into_response()
        }
    }
}

async fn marathon_challenges(
    State(state): State<Arc<MockState>>,
    RawQuery(query): RawQuery,
) -> Response {
    state.data_science_calls.fetch_add(1, Ordering::SeqCst);
    state
        .data_science_queries
        .lock()
        .unwrap()
        .push(query.unwrap_or_default());
    state.pause().await;
    if let Some(failure) = state.forced_failure() {
        return failure;
    }
    Json(json!({
        "data": [
            {
                "fullName": "Marathon Match 90",
                "problemId": 13001,
                "roundId": 16100,
                "startDate": "2014-05-21T12:00:00.000-0400",
                "numberOfRegistrants": 42
            }
        ]
    }))
    .into_response()
}

/// Feed service config pointed at a mock upstream.
pub fn service_config(upstream: &MockUpstream) -> FeedServiceConfig {
    let mut config = FeedServiceConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.upstream.api_host = upstream.host();
    config.timeouts.upstream_ms = 5_000;
    config.timeouts.deadline_ms = 3_000;
    config
}

/// A running feed service.
pub struct TestService {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestService {
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{}", self.addr, path_and_query)
    }
}

impl Drop for TestService {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the feed service on an ephemeral port.
pub async fn start_service(config: FeedServiceConfig) -> TestService {
    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = FeedServer::new(config).unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestService { addr, shutdown }
}

/// HTTP client without connection pooling, so every request is independent.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

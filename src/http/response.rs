//! Response construction.
//!
//! # Responsibilities
//! - Wrap rendered feed documents as `text/xml` responses
//! - Map `FeedError` to the public status/body table
//!
//! # Design Decisions
//! - Error bodies are fixed strings; causes go to the log only
//! - Deadline responses are 202 with an empty body, so clients can retry later

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::error::FeedError;

pub const XML_CONTENT_TYPE: &str = "text/xml; charset=utf-8";

/// Body sent for rejected parameters.
pub const INVALID_PARAMETERS_BODY: &str =
    r#"<?xml version="1.0" encoding="UTF-8"?><text><para>Invalid parameters</para></text>"#;

/// Body sent for upstream and internal failures.
pub const INTERNAL_ERROR_BODY: &str = "Internal Error while building feed";

/// A rendered feed, ready to send.
#[derive(Debug, Clone)]
pub struct FeedDocument(pub Arc<str>);

impl IntoResponse for FeedDocument {
    fn into_response(self) -> Response {
        (
            StatusCode::OK,
            [(header::CONTENT_TYPE, XML_CONTENT_TYPE)],
            Body::from(self.0.to_string()),
        )
            .into_response()
    }
}

impl IntoResponse for FeedError {
    fn into_response(self) -> Response {
        match self {
            FeedError::InvalidQuery(_) => (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, XML_CONTENT_TYPE)],
                INVALID_PARAMETERS_BODY,
            )
                .into_response(),
            FeedError::DeadlineExceeded(_) => StatusCode::ACCEPTED.into_response(),
            FeedError::Upstream(_) | FeedError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                INTERNAL_ERROR_BODY,
            )
                .into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QueryError;
    use std::time::Duration;

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_document_response() {
        let response = FeedDocument(Arc::from("<rss/>")).into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], XML_CONTENT_TYPE);
        assert_eq!(body_string(response).await, "<rss/>");
    }

    #[tokio::test]
    async fn test_invalid_query_response() {
        let response =
            FeedError::InvalidQuery(QueryError::InvalidList("never".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(response.headers()[header::CONTENT_TYPE], XML_CONTENT_TYPE);
        assert_eq!(body_string(response).await, INVALID_PARAMETERS_BODY);
    }

    #[tokio::test]
    async fn test_deadline_response_is_empty() {
        let response = FeedError::DeadlineExceeded(Duration::from_secs(1)).into_response();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(body_string(response).await, "");
    }

    #[tokio::test]
    async fn test_internal_response_hides_cause() {
        let response = FeedError::Internal("pipeline task panicked".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(response).await, INTERNAL_ERROR_BODY);
    }
}

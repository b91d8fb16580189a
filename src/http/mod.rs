//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum router, request id + trace layers)
//!     → request.rs (x-request-id assigned / propagated)
//!     → handler.rs (normalize → cache → pipeline vs deadline)
//!     → response.rs (200 document, 400 / 202 / 500 mapping)
//!     → Send to client
//! ```

pub mod handler;
pub mod request;
pub mod response;
pub mod server;

pub use handler::FeedHandler;
pub use request::X_REQUEST_ID;
pub use response::FeedDocument;
pub use server::{AppState, FeedServer, FEED_PATH, HEALTH_PATH};

//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (fmt layer)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Every failure is logged with query, URL and status; clients never see them
//! - Request ID flows through the trace span of each request
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;

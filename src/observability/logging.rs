//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - RUST_LOG wins; otherwise the configured level applies to this crate
//!   and to tower_http's request spans

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Default filter directive for a configured level.
pub fn default_directive(config: &ObservabilityConfig) -> String {
    format!(
        "challenge_feed={level},tower_http={level}",
        level = config.log_level
    )
}

/// Install the global tracing subscriber.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    let result = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if let Err(e) = result {
        eprintln!("tracing subscriber already installed: {}", e);
    }
}

//! Challenge feed service (v1)
//!
//! # Architecture Overview
//!
//! ```text
//!                         ┌──────────────────────────────────────────────┐
//!                         │                CHALLENGE FEED                │
//!   GET /challenges/feed  │  ┌────────┐   ┌────────┐   ┌─────────────┐   │
//!   ──────────────────────┼─▶│  http  │──▶│ query  │──▶│    cache    │   │
//!                         │  │ server │   │  norm  │   │ (feed docs) │   │
//!                         │  └────────┘   └────────┘   └──────┬──────┘   │
//!                         │                                  miss        │
//!                         │                                   ▼          │
//!                         │  ┌────────┐   ┌──────────┐   ┌──────────┐    │
//!   ◀─────────────────────┼──│  feed  │◀──│aggregate │◀──│ upstream │◀───┼──── Challenge API
//!   RSS / 202 / 400 / 500 │  │ render │   │          │   │  client  │    │
//!                         │  └────────┘   └──────────┘   └──────────┘    │
//!                         └──────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use clap::Parser;
use tokio::net::TcpListener;

use challenge_feed::config;
use challenge_feed::observability::{logging, metrics};
use challenge_feed::{FeedServer, Shutdown};

#[derive(Parser, Debug)]
#[command(name = "challenge-feed", version, about = "RSS feed of open challenges")]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    logging::init_logging(&config.observability);
    tracing::info!("challenge-feed v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        api_host = %config.upstream.api_host,
        cache_ttl_minutes = config.cache.ttl_minutes,
        upstream_timeout_ms = config.timeouts.upstream_ms,
        deadline_ms = config.timeouts.deadline_ms,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(shutdown.trigger_on_signal());

    let server = FeedServer::new(config)?;
    server.run(listener, server_shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

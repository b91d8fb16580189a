//! OS signal handling.
//!
//! Resolves on the first of Ctrl+C or (on Unix) SIGTERM. If a handler cannot
//! be installed the failure is logged and that signal is ignored rather than
//! shutting the service down.

use std::future;

pub async fn wait_for_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C"),
            Err(e) => {
                tracing::error!(error = %e, "Failed to install Ctrl+C handler");
                future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received SIGTERM");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

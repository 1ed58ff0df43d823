//! OS signal handling.
//!
//! # Responsibilities
//! - Translate SIGINT/SIGTERM into the internal shutdown signal
//! - Combine OS signals with the protocol shutdown command into one future
//!   the serve loop can wait on
//!
//! # Design Decisions
//! - Uses Tokio's async-safe signal handling
//! - Whichever source fires first wins; the rest are ignored

use crate::lifecycle::shutdown::Shutdown;

/// Complete when termination is requested: Ctrl-C, SIGTERM (unix), or the
/// protocol shutdown command.
pub async fn shutdown_requested(shutdown: &Shutdown) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            // Fall through to the other sources rather than aborting.
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Ctrl+C received"),
        _ = terminate => tracing::info!("SIGTERM received"),
        _ = shutdown.wait() => tracing::info!("protocol shutdown requested"),
    }
}

use std::sync::Arc;

use tokio::signal;
use tracing::{debug, info, warn};

use super::startup::StartupContext;

/// Wait for Ctrl+C (or SIGTERM on unix).
pub async fn listen_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(
                "Failed to listen for Ctrl+C: {}. Proceeding with shutdown anyway.",
                e
            );
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    info!("Shutdown signal received, stopping server...");
}

/// Release the cache and the database once the server has stopped.
pub fn release_resources(context: StartupContext) {
    let StartupContext {
        lookup,
        cache,
        state,
    } = context;
    drop(state);

    if cache.disable() {
        info!("Response cache released");
    }

    match Arc::try_unwrap(lookup) {
        Ok(service) => {
            service.into_inner().close();
            info!("Geo database closed");
        }
        Err(_) => {
            // 仍有 worker 持有引用，最后一个引用释放时自动回收
            debug!("Geo database still referenced, deferring close to drop");
        }
    }
}

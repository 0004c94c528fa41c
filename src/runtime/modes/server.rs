//! Server mode
//!
//! This module contains the HTTP server startup logic.

use std::time::Duration;

use actix_web::{App, HttpServer};
use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::api::services::locate_routes;
use crate::config::get_config;
use crate::runtime::lifetime;

/// Upper bound on worker threads regardless of core count.
const MAX_WORKERS: usize = 32;

/// Run the HTTP server
///
/// 1. Opens the database and builds the shared cache and handler state
/// 2. Serves every path through the location endpoint
/// 3. Stops gracefully on Ctrl+C / SIGTERM, then releases cache and database
///
/// **Note**: `init_config` and the logging system must be initialized before
/// calling this function
pub async fn run_server() -> Result<()> {
    let config = get_config();
    let startup = lifetime::startup::prepare_server_startup(&config).inspect_err(|e| {
        tracing::error!("Server startup failed: {:#}", e);
    })?;

    let workers = config.server.cpu_count.clamp(1, MAX_WORKERS);
    info!("Using {} worker threads", workers);

    let state = startup.state.clone();
    let bind_address = format!("{}:{}", config.server.host, config.server.port);

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(locate_routes)
    })
    .keep_alive(Duration::from_secs(30))
    .client_request_timeout(Duration::from_millis(5000))
    .client_disconnect_timeout(Duration::from_millis(1000))
    .workers(workers)
    .disable_signals()
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    warn!("Starting server at http://{}", bind_address);

    let handle = server.handle();
    {
        tokio::pin!(server);

        // Wait for server or shutdown signal
        tokio::select! {
            res = &mut server => {
                res.context("HTTP server error")?;
            }
            _ = lifetime::shutdown::listen_for_shutdown() => {
                handle.stop(true).await;
                info!("HTTP server stopped");
            }
        }
    }

    lifetime::shutdown::release_resources(startup);
    Ok(())
}

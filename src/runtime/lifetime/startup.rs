use std::sync::Arc;

use actix_web::web;
use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::api::services::{LocateConfig, LocateState};
use crate::cache::ResponseCacheHandle;
use crate::config::StaticConfig;
use crate::services::geoip::{DatabaseReader, LocationLookup, LookupService};

/// Everything the HTTP server shares across workers.
pub struct StartupContext {
    pub lookup: Arc<LookupService<DatabaseReader>>,
    pub cache: Arc<ResponseCacheHandle>,
    pub state: web::Data<LocateState>,
}

/// 准备服务器启动的上下文
///
/// Opening the database is the only fatal step: without it the process
/// must not serve traffic.
pub fn prepare_server_startup(config: &StaticConfig) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    config.validate().context("Invalid configuration")?;

    let reader = DatabaseReader::open(&config.database.path)
        .with_context(|| format!("Failed to open geo database {}", config.database.path))?;
    let lookup = Arc::new(LookupService::new(reader));
    info!(
        "Serving locations from {} via {}",
        lookup.source().path(),
        lookup.name()
    );

    let cache = Arc::new(ResponseCacheHandle::new(config.cache.to_settings()));

    let locate_config = LocateConfig {
        origin_policy: config.cors.origin_policy.clone(),
    };
    if locate_config.origin_policy.is_empty() {
        info!("Access-Control-Allow-Origin header disabled");
    }

    let shared_lookup: Arc<dyn LocationLookup> = lookup.clone();
    let state = LocateState::new(shared_lookup, Arc::clone(&cache), &locate_config)
        .context("Failed to build request handler state")?;

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext {
        lookup,
        cache,
        state: web::Data::new(state),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_database_is_fatal() {
        let mut config = StaticConfig::default();
        config.database.path = "/nonexistent/GeoLite2-City.mmdb".to_string();

        let err = prepare_server_startup(&config).err().expect("startup should fail");
        assert!(err.to_string().contains("Failed to open geo database"));
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let mut config = StaticConfig::default();
        config.server.port = 0;

        let err = prepare_server_startup(&config).err().expect("startup should fail");
        assert!(err.to_string().contains("Invalid configuration"));
    }
}

use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use super::StaticConfig;

static CONFIG: OnceLock<ArcSwap<StaticConfig>> = OnceLock::new();

/// Get the global configuration instance
///
/// Returns an Arc pointer to the configuration, which is cheap to clone
/// and doesn't hold any locks. Falls back to defaults when `init_config`
/// has not been called (tests, library use).
pub fn get_config() -> Arc<StaticConfig> {
    CONFIG
        .get_or_init(|| ArcSwap::from_pointee(StaticConfig::default()))
        .load_full()
}

/// Install the global configuration
///
/// Later calls replace the stored value, so CLI overrides applied after
/// loading are visible everywhere.
pub fn init_config(config: StaticConfig) {
    let config = Arc::new(config);
    CONFIG
        .get_or_init(|| ArcSwap::new(Arc::clone(&config)))
        .store(config);
}

/// Update the global configuration in place
pub fn update_config<F>(f: F)
where
    F: FnOnce(&mut StaticConfig),
{
    let current = get_config();
    let mut next = (*current).clone();
    f(&mut next);
    init_config(next);
}

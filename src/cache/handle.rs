//! Shared response cache handle
//!
//! The request handler holds one `Arc<ResponseCacheHandle>` for the life of
//! the server. Reads are lock-free through `ArcSwapOption`; enabling and
//! disabling at runtime swap the backing store under a small transition
//! lock so two concurrent toggles cannot both build or close a store.

use std::sync::{Arc, Mutex, PoisonError};

use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use bytes::Bytes;
use tracing::{info, trace};

use super::moka::MokaResponseCache;
use super::traits::{CacheResult, CacheSettings, ResponseCache};

pub struct ResponseCacheHandle {
    settings: CacheSettings,
    active: ArcSwapOption<MokaResponseCache>,
    transition: Mutex<()>,
}

impl ResponseCacheHandle {
    /// Build the handle; the store is created only if `settings.enabled`.
    pub fn new(settings: CacheSettings) -> Self {
        let handle = Self {
            settings,
            active: ArcSwapOption::empty(),
            transition: Mutex::new(()),
        };
        if !handle.settings.enabled || !handle.enable() {
            info!("Response cache disabled");
        }
        handle
    }

    /// A handle that always misses until [`enable`](Self::enable) is called.
    pub fn disabled() -> Self {
        Self::new(CacheSettings {
            enabled: false,
            ..CacheSettings::default()
        })
    }

    pub fn settings(&self) -> &CacheSettings {
        &self.settings
    }

    pub fn is_enabled(&self) -> bool {
        self.active.load().is_some()
    }

    /// Turn caching on with the configured size and TTL.
    ///
    /// Returns `false` if it was already on.
    pub fn enable(&self) -> bool {
        let _guard = self.transition.lock().unwrap_or_else(PoisonError::into_inner);
        if self.active.load().is_some() {
            return false;
        }

        self.active
            .store(Some(Arc::new(MokaResponseCache::new(&self.settings))));
        info!(
            "Response cache enabled (max_size={}MB, ttl={}s)",
            self.settings.max_size_mb,
            self.settings.ttl.as_secs()
        );
        true
    }

    /// Turn caching off and release the store's memory.
    ///
    /// Requests already holding the old store finish against it; new
    /// requests miss and never write. Returns `false` if it was already off.
    pub fn disable(&self) -> bool {
        let _guard = self.transition.lock().unwrap_or_else(PoisonError::into_inner);
        match self.active.swap(None) {
            Some(previous) => {
                previous.close();
                info!("Response cache disabled");
                true
            }
            None => false,
        }
    }
}

#[async_trait]
impl ResponseCache for ResponseCacheHandle {
    async fn get(&self, key: &str) -> CacheResult {
        // load_full: 不能跨 await 持有 Guard
        match self.active.load_full() {
            Some(cache) => cache.get(key).await,
            None => CacheResult::Miss,
        }
    }

    async fn insert(&self, key: &str, body: Bytes) {
        match self.active.load_full() {
            Some(cache) => cache.insert(key, body).await,
            None => trace!("Response cache disabled, skipping insert for {}", key),
        }
    }

    fn entry_count(&self) -> u64 {
        self.active
            .load()
            .as_ref()
            .map_or(0, |cache| cache.entry_count())
    }
}

pub mod handle;
pub mod moka;
pub mod traits;

pub use handle::ResponseCacheHandle;
pub use self::moka::MokaResponseCache;
pub use traits::{
    CacheResult, CacheSettings, DEFAULT_CACHE_TTL, DEFAULT_MAX_CACHE_SIZE_MB, ResponseCache,
};

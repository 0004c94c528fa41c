use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;

/// Default time until a cached response expires.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Default memory ceiling for cached responses, in MB.
pub const DEFAULT_MAX_CACHE_SIZE_MB: u64 = 512;

/// 缓存查询结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheResult {
    /// 命中，返回预先序列化好的响应体
    Hit(Bytes),
    /// 从未写入、已过期或缓存已关闭
    Miss,
}

impl CacheResult {
    pub fn is_hit(&self) -> bool {
        matches!(self, CacheResult::Hit(_))
    }
}

/// 响应缓存配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    pub enabled: bool,
    pub max_size_mb: u64,
    pub ttl: Duration,
}

impl CacheSettings {
    pub fn max_size_bytes(&self) -> u64 {
        self.max_size_mb.saturating_mul(1024 * 1024)
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_size_mb: DEFAULT_MAX_CACHE_SIZE_MB,
            ttl: DEFAULT_CACHE_TTL,
        }
    }
}

/// Bounded, time-expiring store of serialized responses keyed by request text.
///
/// Implementations synchronize internally. `insert` has no error channel: a
/// failed write only costs a future miss.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    async fn get(&self, key: &str) -> CacheResult;
    async fn insert(&self, key: &str, body: Bytes);

    /// Approximate number of live entries.
    fn entry_count(&self) -> u64;
}

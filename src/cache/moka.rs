use async_trait::async_trait;
use bytes::Bytes;
use moka::future::Cache;
use tracing::{debug, trace};

use super::traits::{CacheResult, CacheSettings, ResponseCache};

/// Entry weight in bytes: key text plus payload.
fn entry_weight(key: &String, body: &Bytes) -> u32 {
    u32::try_from(key.len() + body.len()).unwrap_or(u32::MAX)
}

/// Moka 响应缓存
///
/// Capacity is measured in bytes through a weigher, so `max_size_mb` is a
/// real memory ceiling rather than an entry count. Entries past their TTL
/// are reported as misses even before moka evicts them.
pub struct MokaResponseCache {
    inner: Cache<String, Bytes>,
}

impl MokaResponseCache {
    pub fn new(settings: &CacheSettings) -> Self {
        let inner = Cache::builder()
            .weigher(entry_weight)
            .max_capacity(settings.max_size_bytes())
            .time_to_live(settings.ttl)
            .build();

        debug!(
            "MokaResponseCache initialized: max_size={}MB, ttl={}s",
            settings.max_size_mb,
            settings.ttl.as_secs()
        );

        Self { inner }
    }

    /// Drop every entry. The handle that owned this cache stops using it
    /// before calling this.
    pub fn close(&self) {
        trace!("Closing MokaResponseCache");
        self.inner.invalidate_all();
    }

    /// Current total weight in bytes (approximate until pending tasks run).
    pub fn weighted_size(&self) -> u64 {
        self.inner.weighted_size()
    }

    pub async fn run_pending_tasks(&self) {
        self.inner.run_pending_tasks().await;
    }
}

#[async_trait]
impl ResponseCache for MokaResponseCache {
    async fn get(&self, key: &str) -> CacheResult {
        match self.inner.get(key).await {
            Some(body) => CacheResult::Hit(body),
            None => CacheResult::Miss,
        }
    }

    async fn insert(&self, key: &str, body: Bytes) {
        self.inner.insert(key.to_string(), body).await;
    }

    fn entry_count(&self) -> u64 {
        self.inner.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn settings(max_size_mb: u64, ttl: Duration) -> CacheSettings {
        CacheSettings {
            enabled: true,
            max_size_mb,
            ttl,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let cache = MokaResponseCache::new(&CacheSettings::default());

        assert_eq!(cache.get("8.8.8.8").await, CacheResult::Miss);

        cache.insert("8.8.8.8", Bytes::from_static(b"{}")).await;
        assert_eq!(
            cache.get("8.8.8.8").await,
            CacheResult::Hit(Bytes::from_static(b"{}"))
        );

        // 其他 key 不受影响
        assert_eq!(cache.get("1.1.1.1").await, CacheResult::Miss);
    }

    #[tokio::test]
    async fn test_insert_replaces_value() {
        let cache = MokaResponseCache::new(&CacheSettings::default());

        cache.insert("key", Bytes::from_static(b"old")).await;
        cache.insert("key", Bytes::from_static(b"new")).await;

        assert_eq!(
            cache.get("key").await,
            CacheResult::Hit(Bytes::from_static(b"new"))
        );
    }

    #[tokio::test]
    async fn test_ttl_expiry() {
        let cache = MokaResponseCache::new(&settings(1, Duration::from_millis(400)));
        cache.insert("key", Bytes::from_static(b"body")).await;

        // TTL 之前命中
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(cache.get("key").await.is_hit());

        // TTL 之后视为不存在
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(cache.get("key").await, CacheResult::Miss);
    }

    #[tokio::test]
    async fn test_byte_bounded_capacity() {
        let cache = MokaResponseCache::new(&settings(1, Duration::from_secs(60)));
        let body = Bytes::from(vec![b'x'; 64 * 1024]);

        // 写入约 4MB，远超 1MB 上限
        for i in 0..64 {
            cache.insert(&format!("10.0.0.{}", i), body.clone()).await;
        }
        cache.run_pending_tasks().await;

        assert!(cache.weighted_size() <= 1024 * 1024);
        assert!(cache.entry_count() < 64);
    }

    #[tokio::test]
    async fn test_close_drops_entries() {
        let cache = MokaResponseCache::new(&CacheSettings::default());
        cache.insert("key", Bytes::from_static(b"body")).await;

        cache.close();

        assert_eq!(cache.get("key").await, CacheResult::Miss);
    }

    #[test]
    fn test_entry_weight() {
        assert_eq!(entry_weight(&"1.1.1.1".to_string(), &Bytes::from_static(b"abc")), 10);
    }
}

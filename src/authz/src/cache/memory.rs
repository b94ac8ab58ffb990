//! In-process cache store with absolute expiration

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;

use super::{CacheStore, CachedValue};
use crate::error::Result;

/// Entry key scoped by region
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EntryKey {
    region: Option<String>,
    key: String,
}

impl EntryKey {
    fn new(key: &str, region: Option<&str>) -> Self {
        Self {
            region: region.map(str::to_string),
            key: key.to_string(),
        }
    }
}

/// Cache entry with absolute expiration
#[derive(Clone)]
struct CacheEntry {
    value: CachedValue,
    expires_at: DateTime<Utc>,
}

impl CacheEntry {
    fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Statistics about cache performance
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    /// Number of cache hits
    pub hits: usize,
    /// Number of cache misses
    pub misses: usize,
    /// Number of expired entries encountered
    pub expirations: usize,
    /// Total number of entries in cache
    pub entries: usize,
}

impl CacheStats {
    /// Calculates the cache hit rate
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Thread-safe in-memory [`CacheStore`]
///
/// Expired entries are dropped when they are next touched, or in bulk by
/// [`MemoryCache::cleanup_expired`].
#[derive(Default)]
pub struct MemoryCache {
    entries: Arc<DashMap<EntryKey, CacheEntry>>,
    stats: Arc<DashMap<String, usize>>,
}

impl MemoryCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Live entry for `key`, evicting it if expired
    fn live(&self, key: &EntryKey) -> Option<CachedValue> {
        let now = Utc::now();

        let entry = self.entries.get(key)?;
        if !entry.is_expired(now) {
            return Some(Arc::clone(&entry.value));
        }
        drop(entry);

        self.entries.remove_if(key, |_, entry| entry.is_expired(now));
        self.increment_stat("expirations");
        None
    }

    /// Removes expired entries
    pub fn cleanup_expired(&self) {
        let now = Utc::now();
        self.entries.retain(|_, entry| !entry.is_expired(now));
    }

    /// Removes every entry and resets statistics
    pub fn clear(&self) {
        self.entries.clear();
        self.stats.clear();
    }

    /// Number of stored entries, including expired ones not yet evicted
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns cache statistics
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.get_stat("hits"),
            misses: self.get_stat("misses"),
            expirations: self.get_stat("expirations"),
            entries: self.entries.len(),
        }
    }

    fn increment_stat(&self, key: &str) {
        self.stats
            .entry(key.to_string())
            .and_modify(|count| *count += 1)
            .or_insert(1);
    }

    fn get_stat(&self, key: &str) -> usize {
        self.stats.get(key).map(|v| *v).unwrap_or(0)
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    /// A `false` answer counts as a miss; hits are counted by `get`
    async fn contains(&self, key: &str, region: Option<&str>) -> Result<bool> {
        let present = self.live(&EntryKey::new(key, region)).is_some();
        if !present {
            self.increment_stat("misses");
        }
        Ok(present)
    }

    async fn get(&self, key: &str, region: Option<&str>) -> Result<Option<CachedValue>> {
        let value = self.live(&EntryKey::new(key, region));
        self.increment_stat(if value.is_some() { "hits" } else { "misses" });
        Ok(value)
    }

    async fn set(
        &self,
        key: &str,
        value: CachedValue,
        absolute_expiration: DateTime<Utc>,
        region: Option<&str>,
    ) -> Result<()> {
        self.entries.insert(
            EntryKey::new(key, region),
            CacheEntry {
                value,
                expires_at: absolute_expiration,
            },
        );
        Ok(())
    }

    async fn remove(&self, key: &str, region: Option<&str>) -> Result<Option<CachedValue>> {
        let now = Utc::now();
        Ok(self
            .entries
            .remove(&EntryKey::new(key, region))
            .filter(|(_, entry)| !entry.is_expired(now))
            .map(|(_, entry)| entry.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn value(v: &str) -> CachedValue {
        Arc::new(v.to_string())
    }

    #[tokio::test]
    async fn test_set_get() {
        let cache = MemoryCache::new();
        let expires = Utc::now() + Duration::minutes(1);

        assert!(cache.get("k", None).await.unwrap().is_none());
        cache.set("k", value("v"), expires, None).await.unwrap();

        let cached = cache.get("k", None).await.unwrap().unwrap();
        assert_eq!(cached.downcast_ref::<String>().map(String::as_str), Some("v"));

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.entries, 1);
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_region_scoping() {
        let cache = MemoryCache::new();
        let expires = Utc::now() + Duration::minutes(1);

        cache.set("k", value("eu"), expires, Some("eu")).await.unwrap();

        assert!(cache.contains("k", Some("eu")).await.unwrap());
        assert!(!cache.contains("k", Some("us")).await.unwrap());
        assert!(!cache.contains("k", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_absolute_expiration() {
        let cache = MemoryCache::new();
        let expires = Utc::now() + Duration::milliseconds(50);

        cache.set("k", value("v"), expires, None).await.unwrap();
        assert!(cache.contains("k", None).await.unwrap());

        tokio::time::sleep(std::time::Duration::from_millis(100)).await;

        assert!(!cache.contains("k", None).await.unwrap());
        assert!(cache.get("k", None).await.unwrap().is_none());
        assert!(cache.is_empty());
        assert!(cache.stats().expirations > 0);
    }

    #[tokio::test]
    async fn test_contains_absent_counts_miss() {
        let cache = MemoryCache::new();
        let expires = Utc::now() + Duration::minutes(1);

        assert!(!cache.contains("k", None).await.unwrap());
        cache.set("k", value("v"), expires, None).await.unwrap();
        assert!(cache.contains("k", None).await.unwrap());

        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 0);
    }

    #[tokio::test]
    async fn test_past_expiration_never_visible() {
        let cache = MemoryCache::new();
        cache
            .set("k", value("v"), Utc::now() - Duration::seconds(1), None)
            .await
            .unwrap();

        assert!(!cache.contains("k", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_set_replaces() {
        let cache = MemoryCache::new();
        let expires = Utc::now() + Duration::minutes(1);

        cache.set("k", value("first"), expires, None).await.unwrap();
        cache.set("k", value("second"), expires, None).await.unwrap();

        let cached = cache.get("k", None).await.unwrap().unwrap();
        assert_eq!(cached.downcast_ref::<String>().map(String::as_str), Some("second"));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_remove() {
        let cache = MemoryCache::new();
        let expires = Utc::now() + Duration::minutes(1);

        cache.set("k", value("v"), expires, None).await.unwrap();
        assert!(cache.remove("k", None).await.unwrap().is_some());
        assert!(cache.remove("k", None).await.unwrap().is_none());
        assert!(!cache.contains("k", None).await.unwrap());
    }

    #[tokio::test]
    async fn test_cleanup_and_clear() {
        let cache = MemoryCache::new();

        cache
            .set("old", value("v"), Utc::now() - Duration::seconds(1), None)
            .await
            .unwrap();
        cache
            .set("new", value("v"), Utc::now() + Duration::minutes(1), None)
            .await
            .unwrap();
        assert_eq!(cache.len(), 2);

        cache.cleanup_expired();
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.stats().hits, 0);
    }
}

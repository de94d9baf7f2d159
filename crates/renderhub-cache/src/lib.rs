//! # renderhub-cache
//!
//! In-process caches for RenderHub, built on
//! [moka](https://crates.io/crates/moka). One policy: entries expire
//! after a TTL and the cache holds at most a fixed number of items,
//! evicting approximately-least-recently-used entries when full.
//!
//! Two instances exist at runtime — fetched asset bytes and decoded
//! bitmaps — each sized from its own configuration section.

use std::time::Duration;

use moka::future::Cache;

/// A TTL + max-capacity cache keyed by URL-like strings.
#[derive(Debug, Clone)]
pub struct TtlCache<V: Clone + Send + Sync + 'static> {
    cache: Cache<String, V>,
}

impl<V: Clone + Send + Sync + 'static> TtlCache<V> {
    /// Create a cache bounded by entry count and per-entry lifetime.
    pub fn new(max_items: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_items)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    /// Look up a key. Expired entries miss (and are evicted internally).
    pub async fn get(&self, key: &str) -> Option<V> {
        self.cache.get(key).await
    }

    /// Insert a value under the cache policy.
    pub async fn insert(&self, key: String, value: V) {
        self.cache.insert(key, value).await;
    }

    /// Remove a key.
    pub async fn remove(&self, key: &str) {
        self.cache.remove(key).await;
    }

    /// Approximate number of live entries.
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }
}

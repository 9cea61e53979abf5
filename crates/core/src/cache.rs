//! Per-key time-to-live cache shared by the aggregation services.
//!
//! Entries expire lazily: a lookup that finds an entry whose age is at least
//! the TTL removes it and reports a miss. Nothing sweeps in the background.
//! Concurrent misses on one key may both fetch and both `put`; the last write
//! wins.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use log::{debug, warn};
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

/// Thread-safe in-memory cache with a single TTL for every entry.
#[derive(Debug)]
pub struct ExpiringCache<V> {
    ttl: Duration,
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> ExpiringCache<V> {
    /// Create a new cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!("Cache lock poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Get a live value for `key`, purging it if it has expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.lock();
        let expired = match entries.get(key) {
            None => {
                debug!("Cache miss for {}", key);
                return None;
            }
            Some(entry) => entry.stored_at.elapsed() >= self.ttl,
        };

        if expired {
            debug!("Cache entry for {} expired", key);
            entries.remove(key);
            return None;
        }

        debug!("Cache hit for {}", key);
        entries.get(key).map(|entry| entry.value.clone())
    }

    /// Store `value` under `key`, replacing any previous entry and
    /// restarting its TTL.
    pub fn put(&self, key: impl Into<String>, value: V) {
        self.lock().insert(
            key.into(),
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Number of stored entries, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Build a cache key from a symbol, an operation kind and extra parameters.
///
/// Parameters are sorted by name first, so the same set in a different
/// order always yields the same key.
pub fn cache_key(symbol: &str, kind: &str, params: &[(&str, &str)]) -> String {
    let mut key = format!("{}:{}", symbol, kind);
    let mut sorted: Vec<&(&str, &str)> = params.iter().collect();
    sorted.sort();
    for (name, value) in sorted {
        key.push(':');
        key.push_str(name);
        key.push(':');
        key.push_str(value);
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_is_order_independent() {
        let a = cache_key("AAPL", "history", &[("period", "1mo"), ("interval", "1d")]);
        let b = cache_key("AAPL", "history", &[("interval", "1d"), ("period", "1mo")]);
        assert_eq!(a, b);
        assert_eq!(a, "AAPL:history:interval:1d:period:1mo");
    }

    #[test]
    fn test_cache_key_without_params() {
        assert_eq!(cache_key("MSFT", "price", &[]), "MSFT:price");
        assert_ne!(cache_key("MSFT", "price", &[]), cache_key("MSFT", "company_info", &[]));
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_visible_until_ttl() {
        let cache = ExpiringCache::new(Duration::from_secs(300));
        cache.put("AAPL:price", 42);

        tokio::time::advance(Duration::from_millis(299_999)).await;
        assert_eq!(cache.get("AAPL:price"), Some(42));

        tokio::time::advance(Duration::from_millis(2)).await;
        assert_eq!(cache.get("AAPL:price"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_purged_on_lookup() {
        let cache = ExpiringCache::new(Duration::from_secs(10));
        cache.put("a", "x".to_string());
        cache.put("b", "y".to_string());

        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(cache.len(), 2);

        assert_eq!(cache.get("a"), None);
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_put_overwrites_and_restamps() {
        let cache = ExpiringCache::new(Duration::from_secs(10));
        cache.put("k", 1);
        tokio::time::advance(Duration::from_secs(8)).await;
        cache.put("k", 2);
        tokio::time::advance(Duration::from_secs(8)).await;

        assert_eq!(cache.get("k"), Some(2));
    }

    #[test]
    fn test_zero_ttl_never_hits() {
        let cache = ExpiringCache::new(Duration::ZERO);
        cache.put("k", 1);
        assert_eq!(cache.get("k"), None);
        assert!(cache.is_empty());
    }
}

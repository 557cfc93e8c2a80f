//! In-memory response cache with TTL expiry.
//!
//! Keys are `<route>:<content hash>` strings; values are whatever a route
//! computes (extracted text, a full analysis). Entries are written once and
//! never updated: an expired entry is simply removed and recomputed.
//!
//! The cache is best-effort. A poisoned lock degrades to calling the
//! producer directly so a cache fault can never fail the request it was
//! supposed to speed up. There is no in-flight deduplication: two concurrent
//! callers that miss on the same key will both run the producer.

use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, RwLock};
use std::time::Duration;

use crate::clock::{Clock, SystemClock};

struct CacheEntry<V> {
    value: V,
    created_at_ms: u64,
}

/// Process-wide map from content-hash keys to computed values.
///
/// Shared between request handlers via `Arc`; the interior `RwLock` provides
/// the synchronization a multi-threaded runtime requires to keep at most one
/// entry per key.
pub struct ResponseCache<V, C: Clock = SystemClock> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    clock: Arc<C>,
}

impl<V: Clone> ResponseCache<V, SystemClock> {
    /// Create a cache backed by the wall clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }
}

impl<V: Clone> Default for ResponseCache<V, SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone, C: Clock> ResponseCache<V, C> {
    /// Create a cache with an injected clock.
    pub fn with_clock(clock: Arc<C>) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Look up `key`, treating entries older than `ttl` as absent.
    ///
    /// Expired entries are evicted here, on read.
    pub fn get(&self, key: &str, ttl: Duration) -> Option<V> {
        let now = self.clock.now_millis();
        let ttl_ms = ttl.as_millis() as u64;

        let expired = {
            let entries = match self.entries.read() {
                Ok(guard) => guard,
                Err(_) => {
                    tracing::warn!("response cache lock poisoned, treating as miss");
                    return None;
                }
            };
            match entries.get(key) {
                Some(entry) if now.saturating_sub(entry.created_at_ms) <= ttl_ms => {
                    return Some(entry.value.clone());
                }
                Some(_) => true,
                None => false,
            }
        };

        if expired {
            if let Ok(mut entries) = self.entries.write() {
                entries.remove(key);
            }
        }
        None
    }

    /// Store `value` under `key`, stamped with the current time.
    pub fn insert(&self, key: impl Into<String>, value: V) {
        let entry = CacheEntry {
            value,
            created_at_ms: self.clock.now_millis(),
        };
        match self.entries.write() {
            Ok(mut entries) => {
                entries.insert(key.into(), entry);
            }
            Err(_) => {
                tracing::warn!("response cache lock poisoned, dropping write");
            }
        }
    }

    /// Return the cached value for `key`, or run `producer` and cache its
    /// result under `key` with the given `ttl`.
    ///
    /// A hit within `ttl` never invokes the producer. Producer errors are
    /// returned as-is and nothing is stored.
    pub async fn get_or_compute<F, Fut, E>(
        &self,
        key: &str,
        ttl: Duration,
        producer: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key, ttl) {
            tracing::debug!(key, "cache hit");
            return Ok(value);
        }

        tracing::debug!(key, "cache miss, computing value");
        let value = producer().await?;
        self.insert(key, value.clone());
        Ok(value)
    }

    /// Remove a single entry.
    pub fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.remove(key);
        }
    }

    /// Drop every entry older than `ttl`. Returns the number evicted.
    ///
    /// Called from a scheduled maintenance task; lazy eviction on read keeps
    /// correctness even if the sweep never runs.
    pub fn purge_expired(&self, ttl: Duration) -> usize {
        let now = self.clock.now_millis();
        let ttl_ms = ttl.as_millis() as u64;

        match self.entries.write() {
            Ok(mut entries) => {
                let before = entries.len();
                entries.retain(|_, entry| now.saturating_sub(entry.created_at_ms) <= ttl_ms);
                before - entries.len()
            }
            Err(_) => {
                tracing::warn!("response cache lock poisoned, skipping purge");
                0
            }
        }
    }

    /// Number of live entries (expired-but-unswept entries included).
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all entries.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }
}

/// Build a cache key from a route discriminator and raw content bytes.
pub fn content_key(route: &str, content: &[u8]) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(content);
    format!("{}:{:x}", route, hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::convert::Infallible;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn test_cache() -> (ResponseCache<String, ManualClock>, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::at(1_000_000));
        (ResponseCache::with_clock(clock.clone()), clock)
    }

    #[tokio::test]
    async fn second_call_within_ttl_skips_producer() {
        let (cache, _clock) = test_cache();
        let calls = AtomicUsize::new(0);
        let ttl = Duration::from_secs(60);

        for _ in 0..2 {
            let value: Result<String, Infallible> = cache
                .get_or_compute("k", ttl, || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok("computed".to_string())
                })
                .await;
            assert_eq!(value.unwrap(), "computed");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_entry_recomputes() {
        let (cache, clock) = test_cache();
        let calls = AtomicUsize::new(0);
        let ttl = Duration::from_secs(60);

        let produce = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, Infallible>("v".to_string())
        };

        cache.get_or_compute("k", ttl, produce).await.unwrap();
        clock.advance(61_000);
        cache.get_or_compute("k", ttl, produce).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn producer_error_is_not_cached() {
        let (cache, _clock) = test_cache();
        let ttl = Duration::from_secs(60);

        let failed: Result<String, &str> = cache
            .get_or_compute("k", ttl, || async { Err("boom") })
            .await;
        assert!(failed.is_err());
        assert!(cache.is_empty());

        let ok: Result<String, &str> = cache
            .get_or_compute("k", ttl, || async { Ok("fine".to_string()) })
            .await;
        assert_eq!(ok.unwrap(), "fine");
    }

    #[test]
    fn purge_drops_only_expired_entries() {
        let (cache, clock) = test_cache();
        cache.insert("old", "a".to_string());
        clock.advance(30_000);
        cache.insert("fresh", "b".to_string());
        clock.advance(40_000);

        // "old" is now 70s old, "fresh" 40s old.
        let evicted = cache.purge_expired(Duration::from_secs(60));
        assert_eq!(evicted, 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("fresh", Duration::from_secs(60)).is_some());
    }

    #[test]
    fn distinct_routes_get_distinct_keys() {
        let a = content_key("process-pdf", b"same bytes");
        let b = content_key("analyze-990", b"same bytes");
        assert_ne!(a, b);
        assert!(a.starts_with("process-pdf:"));
        // Hash is stable for identical content.
        assert_eq!(a, content_key("process-pdf", b"same bytes"));
    }

}

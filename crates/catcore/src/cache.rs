// SPDX-License-Identifier: MIT

//! TTL-keyed state cache (C7).
//!
//! Keys are namespaced per operation and VFO (`"freq_A"`, `"mode_Main"`,
//! `"rit_state"`, `"signal_strength"`, ...). Every mutating controller
//! operation invalidates its key(s) before returning to the caller;
//! disconnect invalidates everything.

use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

use crate::error::CatResult;

struct Entry {
    value: Box<dyn Any + Send + Sync>,
    inserted_at: Instant,
}

/// Snapshot of cache hit/miss/invalidation counters, exposed by
/// `Controller::cache_statistics()`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStatistics {
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
}

pub struct Cache {
    entries: HashMap<String, Entry>,
    default_ttl: Duration,
    stats: CacheStatistics,
}

impl Cache {
    pub fn new(default_ttl: Duration) -> Self {
        Cache {
            entries: HashMap::new(),
            default_ttl,
            stats: CacheStatistics::default(),
        }
    }

    fn is_fresh(entry: &Entry, max_age: Duration) -> bool {
        entry.inserted_at.elapsed() <= max_age
    }

    /// Return the cached value under `key` if it is fresher than `max_age`
    /// (defaulting to the cache's configured TTL); otherwise call `fetch`,
    /// store, and return its result.
    pub async fn get<V, F, Fut>(
        &mut self,
        key: &str,
        max_age: Option<Duration>,
        fetch: F,
    ) -> CatResult<V>
    where
        V: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = CatResult<V>>,
    {
        let max_age = max_age.unwrap_or(self.default_ttl);
        if let Some(entry) = self.entries.get(key) {
            if Self::is_fresh(entry, max_age) {
                if let Some(value) = entry.value.downcast_ref::<V>() {
                    self.stats.hits += 1;
                    return Ok(value.clone());
                }
            }
        }
        self.stats.misses += 1;
        let value = fetch().await?;
        self.entries.insert(
            key.to_string(),
            Entry {
                value: Box::new(value.clone()),
                inserted_at: Instant::now(),
            },
        );
        Ok(value)
    }

    /// Bypass the cache for this read, then invalidate the key so the next
    /// cached read refetches too (used by `get_x_fresh` operations).
    pub async fn get_fresh<V, F, Fut>(&mut self, key: &str, fetch: F) -> CatResult<V>
    where
        V: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = CatResult<V>>,
    {
        let value = fetch().await?;
        self.invalidate(Some(key));
        Ok(value)
    }

    /// Drop a single key, or the whole cache when `key` is `None`.
    pub fn invalidate(&mut self, key: Option<&str>) {
        match key {
            Some(key) => {
                if self.entries.remove(key).is_some() {
                    self.stats.invalidations += 1;
                }
            }
            None => {
                self.stats.invalidations += self.entries.len() as u64;
                self.entries.clear();
            }
        }
    }

    pub fn statistics(&self) -> CacheStatistics {
        self.stats
    }

    /// Resets counters and entries; called on disconnect/reconnect.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.stats = CacheStatistics::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatError;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn caches_within_ttl() {
        let mut cache = Cache::new(Duration::from_millis(500));
        let calls = AtomicU32::new(0);
        let fetch = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<u64, CatError>(14_230_000)
        };
        let first = cache.get("freq_A", None, fetch).await.unwrap();
        let second = cache
            .get("freq_A", None, || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<u64, CatError>(99)
            })
            .await
            .unwrap();
        assert_eq!(first, 14_230_000);
        assert_eq!(second, 14_230_000);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cache.statistics().hits, 1);
        assert_eq!(cache.statistics().misses, 1);
    }

    #[tokio::test]
    async fn expired_entry_triggers_refetch() {
        let mut cache = Cache::new(Duration::from_millis(1));
        cache
            .get("freq_A", None, || async { Ok::<u64, CatError>(1) })
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        let value = cache
            .get("freq_A", None, || async { Ok::<u64, CatError>(2) })
            .await
            .unwrap();
        assert_eq!(value, 2);
        assert_eq!(cache.statistics().misses, 2);
    }

    #[tokio::test]
    async fn get_fresh_bypasses_and_invalidates() {
        let mut cache = Cache::new(Duration::from_secs(10));
        cache
            .get("freq_A", None, || async { Ok::<u64, CatError>(1) })
            .await
            .unwrap();
        let fresh = cache
            .get_fresh("freq_A", || async { Ok::<u64, CatError>(2) })
            .await
            .unwrap();
        assert_eq!(fresh, 2);
        // Key was invalidated by get_fresh, so the next cached get must miss.
        let value = cache
            .get("freq_A", None, || async { Ok::<u64, CatError>(3) })
            .await
            .unwrap();
        assert_eq!(value, 3);
    }

    #[tokio::test]
    async fn invalidate_all_clears_every_key() {
        let mut cache = Cache::new(Duration::from_secs(10));
        cache
            .get("freq_A", None, || async { Ok::<u64, CatError>(1) })
            .await
            .unwrap();
        cache
            .get("mode_A", None, || async { Ok::<u64, CatError>(2) })
            .await
            .unwrap();
        cache.invalidate(None);
        assert_eq!(cache.statistics().invalidations, 2);
    }

    #[tokio::test]
    async fn reset_zeroes_statistics() {
        let mut cache = Cache::new(Duration::from_secs(10));
        cache
            .get("freq_A", None, || async { Ok::<u64, CatError>(1) })
            .await
            .unwrap();
        cache.reset();
        assert_eq!(cache.statistics(), CacheStatistics::default());
    }
}

//! Time-to-live cache
//!
//! A mutex-guarded map with per-entry expiry. Expiry is lazy: entries are
//! checked, and dropped if stale, when read. The lock is never held across an
//! `.await`, so `get_or_compute` runs its computation unlocked.
//!
//! `get_or_compute` is the fetch-or-cache entry point. Its computation decides
//! whether the value it produced may be stored ([`Lookup::Fresh`]) or must be
//! handed back without caching ([`Lookup::Uncached`]). `set` is only for
//! warming the cache with data already known to be complete.

use crate::error::Result;
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, trace};

struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Outcome of [`TtlCache::get_or_compute`]
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<V, P> {
    /// Served from the cache, or computed and stored
    Fresh(V),
    /// Computed but not fit for caching; returned without being stored
    Uncached(P),
}

impl<V> Lookup<V, V> {
    /// The value, whichever way it was obtained
    pub fn into_value(self) -> V {
        match self {
            Lookup::Fresh(value) | Lookup::Uncached(value) => value,
        }
    }
}

/// Point-in-time counters of a cache
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered by a fresh entry
    pub hits: u64,
    /// Lookups that found nothing, or only an expired entry
    pub misses: u64,
    /// Values stored by `get_or_compute`
    pub computed: u64,
    /// Entries currently held, expired ones included until read
    pub entries: usize,
}

impl CacheStats {
    /// Fraction of lookups served from the cache
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Key-value store with per-entry expiry
pub struct TtlCache<K, V> {
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
    hits: AtomicU64,
    misses: AtomicU64,
    computed: AtomicU64,
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
{
    /// Create an empty cache
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            computed: AtomicU64::new(0),
        }
    }

    // a panic while holding the lock cannot leave the map half-updated
    fn lock(&self) -> MutexGuard<'_, HashMap<K, CacheEntry<V>>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `value` under `key` for `ttl`, for values known to be complete
    pub fn set(&self, key: K, value: V, ttl: Duration) {
        let expires_at = Instant::now() + ttl;
        self.lock().insert(key, CacheEntry { value, expires_at });
    }

    /// Remove every entry
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Drop all expired entries, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired(now));
        before - entries.len()
    }

    /// Number of stored entries, expired ones included until they are read
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Current hit/miss counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            computed: self.computed.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Fresh value for `key`, if any
    pub fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        let mut entries = self.lock();
        let found = match entries.get(key) {
            Some(entry) if !entry.is_expired(now) => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        };
        drop(entries);

        let counter = if found.is_some() {
            &self.hits
        } else {
            &self.misses
        };
        counter.fetch_add(1, Ordering::Relaxed);
        found
    }

    /// Cached value for `key`, or whatever `compute` produces.
    ///
    /// A [`Lookup::Fresh`] result is stored for `ttl`; a [`Lookup::Uncached`]
    /// one is returned untouched. A failed computation stores nothing and its
    /// error is returned as-is. Concurrent misses on one key may each compute;
    /// the last write wins.
    pub async fn get_or_compute<P, F, Fut>(
        &self,
        key: K,
        ttl: Duration,
        compute: F,
    ) -> Result<Lookup<V, P>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Lookup<V, P>>>,
    {
        if let Some(value) = self.get(&key) {
            return Ok(Lookup::Fresh(value));
        }
        match compute().await? {
            Lookup::Fresh(value) => {
                self.set(key, value.clone(), ttl);
                self.computed.fetch_add(1, Ordering::Relaxed);
                Ok(Lookup::Fresh(value))
            }
            uncached @ Lookup::Uncached(_) => {
                trace!("computed value left uncached");
                Ok(uncached)
            }
        }
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + AsRef<str>,
{
    /// Remove every key containing `pattern`, or everything when `None`.
    ///
    /// Returns the number of entries removed.
    pub fn invalidate(&self, pattern: Option<&str>) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        match pattern {
            None => entries.clear(),
            Some(pattern) => entries.retain(|key, _| !key.as_ref().contains(pattern)),
        }
        let removed = before - entries.len();
        drop(entries);

        match pattern {
            Some(pattern) => debug!(pattern, removed, "cache invalidated"),
            None => trace!(removed, "cache cleared"),
        }
        removed
    }
}

impl<K, V> std::fmt::Debug for TtlCache<K, V>
where
    K: Eq + Hash,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

//! The query cache
//!
//! Owns every cache entry, keyed by structural equality of [`QueryKey`].
//! Guarantees at most one in-flight fetch per key: the first caller claims
//! the key and runs the fetch, later callers for the same key block on a
//! condvar and are served the winner's result. Writes flow only through the
//! fetch/invalidate protocol; nothing else mutates entries.

use super::descriptor::QueryDescriptor;
use super::key::QueryKey;
use crate::error::{Error, Result};
use crate::sync::{MutexExt, RwLockExt};
use log::{debug, warn};
use lru::LruCache;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::sync::{Condvar, Mutex, RwLock};
use std::time::{Duration, Instant};

/// Eviction strategy for the query cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheStrategy {
    /// Keep everything (default)
    #[default]
    Full,
    /// LRU cache with maximum entries
    Lru(usize),
    /// Never store - every read fetches (high traffic, minimal memory)
    None,
}

impl CacheStrategy {
    /// Validate cache strategy configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the LRU size is 0.
    pub fn validate(&self) -> Result<()> {
        match self {
            CacheStrategy::Lru(size) if *size == 0 => Err(Error::InvalidCacheStrategy(
                "LRU cache size must be greater than 0".into(),
            )),
            _ => Ok(()),
        }
    }
}

/// One cached fetch result
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Last successful payload; survives later failed fetches
    pub data: Option<Value>,
    /// Message of the last failed fetch, cleared on success
    pub error: Option<String>,
    /// When the last fetch settled
    pub fetched_at: Instant,
    /// Marked by invalidation; a stale entry is refetched on the next read
    pub stale: bool,
    /// Bumped on every settle, for observing refetches in tests
    pub generation: u64,
}

enum EntryMap {
    Unbounded(HashMap<QueryKey, CacheEntry>),
    Bounded(LruCache<QueryKey, CacheEntry>),
    Disabled,
}

impl EntryMap {
    fn get_promote(&mut self, key: &QueryKey) -> Option<&CacheEntry> {
        match self {
            EntryMap::Unbounded(map) => map.get(key),
            EntryMap::Bounded(map) => map.get(key),
            EntryMap::Disabled => None,
        }
    }

    fn get_mut(&mut self, key: &QueryKey) -> Option<&mut CacheEntry> {
        match self {
            EntryMap::Unbounded(map) => map.get_mut(key),
            EntryMap::Bounded(map) => map.peek_mut(key),
            EntryMap::Disabled => None,
        }
    }

    fn peek(&self, key: &QueryKey) -> Option<&CacheEntry> {
        match self {
            EntryMap::Unbounded(map) => map.get(key),
            EntryMap::Bounded(map) => map.peek(key),
            EntryMap::Disabled => None,
        }
    }

    fn insert(&mut self, key: QueryKey, entry: CacheEntry) {
        match self {
            EntryMap::Unbounded(map) => {
                map.insert(key, entry);
            }
            EntryMap::Bounded(map) => {
                map.put(key, entry);
            }
            EntryMap::Disabled => {}
        }
    }

    fn remove(&mut self, key: &QueryKey) {
        match self {
            EntryMap::Unbounded(map) => {
                map.remove(key);
            }
            EntryMap::Bounded(map) => {
                map.pop(key);
            }
            EntryMap::Disabled => {}
        }
    }

    fn for_each_mut(&mut self, mut f: impl FnMut(&QueryKey, &mut CacheEntry)) {
        match self {
            EntryMap::Unbounded(map) => {
                for (k, v) in map.iter_mut() {
                    f(k, v);
                }
            }
            EntryMap::Bounded(map) => {
                for (k, v) in map.iter_mut() {
                    f(k, v);
                }
            }
            EntryMap::Disabled => {}
        }
    }

    fn clear(&mut self) {
        match self {
            EntryMap::Unbounded(map) => map.clear(),
            EntryMap::Bounded(map) => map.clear(),
            EntryMap::Disabled => {}
        }
    }
}

/// Keyed cache with per-key fetch de-duplication
pub struct QueryCache {
    entries: RwLock<EntryMap>,
    inflight: Mutex<HashSet<QueryKey>>,
    settled: Condvar,
    stale_after: Option<Duration>,
}

impl QueryCache {
    /// Build a cache with the given strategy and optional freshness window
    ///
    /// With no `stale_after`, entries stay fresh until invalidated.
    ///
    /// # Errors
    ///
    /// Returns an error for an invalid strategy (`Lru(0)`).
    pub fn new(strategy: CacheStrategy, stale_after: Option<Duration>) -> Result<Self> {
        strategy.validate()?;
        let entries = match strategy {
            CacheStrategy::Full => EntryMap::Unbounded(HashMap::new()),
            CacheStrategy::Lru(size) => {
                let cap = NonZeroUsize::new(size).ok_or_else(|| {
                    Error::InvalidCacheStrategy("LRU cache size must be greater than 0".into())
                })?;
                EntryMap::Bounded(LruCache::new(cap))
            }
            CacheStrategy::None => EntryMap::Disabled,
        };
        Ok(Self {
            entries: RwLock::new(entries),
            inflight: Mutex::new(HashSet::new()),
            settled: Condvar::new(),
            stale_after,
        })
    }

    /// Serve the cached value, fetching if missing or stale
    ///
    /// Blocks until a value is available. Concurrent calls for the same key
    /// are collapsed into one fetch.
    ///
    /// # Errors
    ///
    /// Propagates the fetch failure when a fetch was needed and failed.
    pub fn fetch(&self, descriptor: &QueryDescriptor) -> Result<Value> {
        if let Some(value) = self.fresh_value(descriptor.key())? {
            debug!("cache hit: {}", descriptor.key());
            return Ok(value);
        }
        self.fetch_now(descriptor, true)
    }

    /// Fetch regardless of freshness (polling, explicit refetch)
    ///
    /// Still de-duplicated: a forced fetch joining an in-flight one is served
    /// that fetch's result instead of issuing a second request.
    ///
    /// # Errors
    ///
    /// Propagates the fetch failure.
    pub fn force_fetch(&self, descriptor: &QueryDescriptor) -> Result<Value> {
        self.fetch_now(descriptor, false)
    }

    /// Populate the cache ahead of a read (the route-loader contract)
    ///
    /// Fetch failures are swallowed here; the read path will retry and is the
    /// place failures surface.
    pub fn prefetch_query(&self, descriptor: &QueryDescriptor) {
        match self.fetch(descriptor) {
            Ok(_) => debug!("prefetched: {}", descriptor.key()),
            Err(e) => debug!("prefetch failed for {}: {e}", descriptor.key()),
        }
    }

    /// Snapshot one entry without fetching
    pub fn peek(&self, key: &QueryKey) -> Option<CacheEntry> {
        self.entries
            .read_recovered()
            .ok()
            .and_then(|entries| entries.peek(key).cloned())
    }

    /// Mark one entry stale; the next read through it refetches
    pub fn invalidate(&self, key: &QueryKey) {
        let mut entries = match self.entries.write_recovered() {
            Ok(guard) => guard,
            Err(_) => return,
        };
        if let Some(entry) = entries.get_mut(key) {
            entry.stale = true;
            debug!("invalidated: {key}");
        }
    }

    /// Mark every entry of a resource stale (listings and entities alike)
    pub fn invalidate_resource(&self, resource: &str) {
        let mut entries = match self.entries.write_recovered() {
            Ok(guard) => guard,
            Err(_) => return,
        };
        let mut count = 0usize;
        entries.for_each_mut(|key, entry| {
            if key.resource() == resource {
                entry.stale = true;
                count += 1;
            }
        });
        debug!("invalidated {count} entries for resource '{resource}'");
    }

    /// Drop one entry entirely
    pub fn remove(&self, key: &QueryKey) {
        if let Ok(mut entries) = self.entries.write_recovered() {
            entries.remove(key);
        }
    }

    /// Drop everything (sign-out)
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write_recovered() {
            entries.clear();
        }
        debug!("query cache cleared");
    }

    /// A fresh, servable value for the key, if one exists
    fn fresh_value(&self, key: &QueryKey) -> Result<Option<Value>> {
        let mut entries = self.entries.write_recovered()?;
        let Some(entry) = entries.get_promote(key) else {
            return Ok(None);
        };
        if entry.stale || entry.data.is_none() {
            return Ok(None);
        }
        if let Some(window) = self.stale_after {
            if entry.fetched_at.elapsed() >= window {
                return Ok(None);
            }
        }
        Ok(entry.data.clone())
    }

    /// Claim the key (or wait out the current claimant), then fetch and settle
    ///
    /// With `recheck`, a claim immediately re-reads the entry map before
    /// fetching, so a fetch that settled between the caller's freshness check
    /// and the claim is served instead of repeated.
    fn fetch_now(&self, descriptor: &QueryDescriptor, recheck: bool) -> Result<Value> {
        let key = descriptor.key();
        loop {
            let mut inflight = self.inflight.lock_recovered()?;
            if !inflight.contains(key) {
                inflight.insert(key.clone());
                break;
            }
            // Another caller is fetching this key; wait for it to settle
            let guard = match self.settled.wait(inflight) {
                Ok(guard) => guard,
                Err(poisoned) => {
                    warn!("Condvar wait recovered from poisoned lock");
                    poisoned.into_inner()
                }
            };
            drop(guard);
            if let Some(value) = self.fresh_value(key)? {
                debug!("deduplicated fetch served from cache: {key}");
                return Ok(value);
            }
            // The claimant failed (or the entry went stale again); try to
            // claim the key ourselves.
        }

        // Claim released on all exits, including a panicking fetch closure
        let _claim = InflightClaim { cache: self, key };

        if recheck {
            if let Some(value) = self.fresh_value(key)? {
                return Ok(value);
            }
        }

        debug!("fetching: {key}");
        let result = descriptor.run();
        self.settle(key, &result);
        result
    }

    /// Write a settled fetch result into the entry map
    fn settle(&self, key: &QueryKey, result: &Result<Value>) {
        let mut entries = match self.entries.write_recovered() {
            Ok(guard) => guard,
            Err(_) => return,
        };
        let previous = entries.peek(key);
        let generation = previous.map_or(1, |e| e.generation + 1);
        let entry = match result {
            Ok(value) => CacheEntry {
                data: Some(value.clone()),
                error: None,
                fetched_at: Instant::now(),
                stale: false,
                generation,
            },
            Err(e) => CacheEntry {
                // Keep the last good payload; mark stale so the next read retries
                data: previous.and_then(|p| p.data.clone()),
                error: Some(e.to_string()),
                fetched_at: Instant::now(),
                stale: true,
                generation,
            },
        };
        entries.insert(key.clone(), entry);
    }
}

/// RAII release of an in-flight claim
struct InflightClaim<'a> {
    cache: &'a QueryCache,
    key: &'a QueryKey,
}

impl Drop for InflightClaim<'_> {
    fn drop(&mut self) {
        if let Ok(mut inflight) = self.cache.inflight.lock_recovered() {
            inflight.remove(self.key);
        }
        self.cache.settled.notify_all();
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::key::QueryKey;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_descriptor(key: QueryKey, hits: Arc<AtomicUsize>) -> QueryDescriptor {
        QueryDescriptor::new(key, move || {
            let n = hits.fetch_add(1, Ordering::SeqCst) + 1;
            Ok(json!({"fetch": n}))
        })
    }

    #[test]
    fn test_second_read_served_from_cache() {
        let cache = QueryCache::new(CacheStrategy::Full, None).unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let d = counting_descriptor(QueryKey::of("things"), hits.clone());

        assert_eq!(cache.fetch(&d).unwrap(), json!({"fetch": 1}));
        assert_eq!(cache.fetch(&d).unwrap(), json!({"fetch": 1}));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_invalidate_forces_refetch() {
        let cache = QueryCache::new(CacheStrategy::Full, None).unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let key = QueryKey::of("things");
        let d = counting_descriptor(key.clone(), hits.clone());

        cache.fetch(&d).unwrap();
        cache.invalidate(&key);
        assert_eq!(cache.fetch(&d).unwrap(), json!({"fetch": 2}));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_invalidate_resource_marks_listing_and_entity() {
        let cache = QueryCache::new(CacheStrategy::Full, None).unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let listing = counting_descriptor(QueryKey::of("clusters"), hits.clone());
        let entity = counting_descriptor(QueryKey::of("clusters").param("id", 3), hits.clone());
        let other = counting_descriptor(QueryKey::of("servers"), hits.clone());

        cache.fetch(&listing).unwrap();
        cache.fetch(&entity).unwrap();
        cache.fetch(&other).unwrap();

        cache.invalidate_resource("clusters");

        assert!(cache.peek(listing.key()).unwrap().stale);
        assert!(cache.peek(entity.key()).unwrap().stale);
        assert!(!cache.peek(other.key()).unwrap().stale);
    }

    #[test]
    fn test_failed_fetch_keeps_previous_data_and_retries() {
        let cache = QueryCache::new(CacheStrategy::Full, None).unwrap();
        let key = QueryKey::of("flaky");
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = hits.clone();
        let d = QueryDescriptor::new(key.clone(), move || {
            match hits_clone.fetch_add(1, Ordering::SeqCst) {
                0 => Ok(json!("first")),
                1 => Err(Error::Network("connection reset".into())),
                _ => Ok(json!("third")),
            }
        });

        assert_eq!(cache.fetch(&d).unwrap(), json!("first"));
        assert!(cache.force_fetch(&d).is_err());

        let entry = cache.peek(&key).unwrap();
        assert_eq!(entry.data, Some(json!("first")));
        assert!(entry.stale);

        // The stale mark makes a plain read retry
        assert_eq!(cache.fetch(&d).unwrap(), json!("third"));
    }

    #[test]
    fn test_concurrent_fetches_deduplicate() {
        let cache = Arc::new(QueryCache::new(CacheStrategy::Full, None).unwrap());
        let hits = Arc::new(AtomicUsize::new(0));
        let hits_clone = hits.clone();
        let d = QueryDescriptor::new(QueryKey::of("slow"), move || {
            hits_clone.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(50));
            Ok(json!("done"))
        });

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = cache.clone();
                let d = d.clone();
                std::thread::spawn(move || cache.fetch(&d).unwrap())
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), json!("done"));
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_lru_strategy_evicts() {
        let cache = QueryCache::new(CacheStrategy::Lru(2), None).unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let a = counting_descriptor(QueryKey::of("a"), hits.clone());
        let b = counting_descriptor(QueryKey::of("b"), hits.clone());
        let c = counting_descriptor(QueryKey::of("c"), hits.clone());

        cache.fetch(&a).unwrap();
        cache.fetch(&b).unwrap();
        cache.fetch(&c).unwrap();

        assert!(cache.peek(a.key()).is_none());
        assert!(cache.peek(c.key()).is_some());
    }

    #[test]
    fn test_disabled_strategy_always_fetches() {
        let cache = QueryCache::new(CacheStrategy::None, None).unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let d = counting_descriptor(QueryKey::of("x"), hits.clone());

        cache.fetch(&d).unwrap();
        cache.fetch(&d).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_lru_zero_is_config_error() {
        assert!(matches!(
            QueryCache::new(CacheStrategy::Lru(0), None),
            Err(Error::InvalidCacheStrategy(_))
        ));
    }

    #[test]
    fn test_stale_after_window() {
        let cache =
            QueryCache::new(CacheStrategy::Full, Some(Duration::from_millis(10))).unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let d = counting_descriptor(QueryKey::of("aging"), hits.clone());

        cache.fetch(&d).unwrap();
        std::thread::sleep(Duration::from_millis(20));
        cache.fetch(&d).unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}

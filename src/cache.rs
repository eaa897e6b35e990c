//! Lookup result caching.
//!
//! [`LookupCache`] is an LRU memo of [`LookupResult`]s keyed by the exact
//! `(method, request_uri, url_path)` triple passed to
//! [`Router::lookup`]. It is gated behind the `cache` feature flag and uses
//! the [`lru`] crate internally.
//!
//! The cache remembers which router, and which router
//! [generation](Router::generation), its entries were computed against.
//! [`Router::lookup_cached`] drops every entry when either differs, so
//! registering a route never serves a stale answer and a cache passed to a
//! second router never answers with the first router's routes.
//!
//! [`CacheStats`] tracks hits, misses, and invalidations so you can monitor
//! cache effectiveness at runtime.
//!
//! # Examples
//!
//! ```
//! use pathmux::{LookupCache, Router};
//!
//! let mut router = Router::new();
//! router.get("/users/:id", "user").unwrap();
//!
//! let mut cache = LookupCache::new();
//! router.lookup_cached(&mut cache, "GET", "/users/7", "");
//! router.lookup_cached(&mut cache, "GET", "/users/7", "");
//!
//! assert_eq!(cache.stats().hits, 1);
//! assert_eq!(cache.stats().misses, 1);
//! ```

use crate::handler::Handler;
use crate::router::{LookupResult, Router};
use crate::{debug_log, trace_log};
use lru::LruCache;
use std::fmt;
use std::num::NonZeroUsize;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    method: String,
    request_uri: String,
    url_path: String,
}

impl CacheKey {
    fn new(method: &str, request_uri: &str, url_path: &str) -> Self {
        Self {
            method: method.to_string(),
            request_uri: request_uri.to_string(),
            url_path: url_path.to_string(),
        }
    }
}

/// Counters tracking cache hit/miss rates and invalidations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of lookups answered from the cache.
    pub hits: usize,
    /// Number of lookups that went to the trie.
    pub misses: usize,
    /// Number of times the whole cache was dropped.
    pub invalidations: usize,
}

impl CacheStats {
    /// Return the hit rate as a value in `0.0..=1.0`.
    ///
    /// Returns `0.0` if no lookups have been performed.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache of lookup results.
///
/// Default capacity is 1000 entries.
pub struct LookupCache<H> {
    entries: LruCache<CacheKey, LookupResult<H>>,
    /// `(router id, generation)` the entries belong to.
    owner: Option<(u64, u64)>,
    stats: CacheStats,
}

impl<H> LookupCache<H> {
    const DEFAULT_CAPACITY: usize = 1000;

    /// Create a cache with the default capacity (1000 entries).
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a cache holding up to `capacity` results. A capacity of zero
    /// is treated as one.
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(cap),
            owner: None,
            stats: CacheStats::default(),
        }
    }

    /// Drop every entry and increment the invalidation counter.
    pub fn clear(&mut self) {
        let len = self.entries.len();
        self.entries.clear();
        self.stats.invalidations += 1;
        debug_log!(
            "Lookup cache cleared: {} entries removed ({} total invalidations, hit rate: {:.1}%)",
            len,
            self.stats.invalidations,
            self.stats.hit_rate() * 100.0
        );
    }

    /// Bind the cache to a router and its generation, clearing it if the
    /// entries belong to another router or generation.
    pub(crate) fn sync_owner(&mut self, router_id: u64, generation: u64) {
        let owner = (router_id, generation);
        match self.owner {
            Some(current) if current == owner => {}
            Some(_) => {
                self.clear();
                self.owner = Some(owner);
            }
            None => self.owner = Some(owner),
        }
    }

    /// Return a reference to the current cache statistics.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Reset all counters in [`CacheStats`] to zero.
    pub fn reset_stats(&mut self) {
        self.stats = CacheStats::default();
    }

    /// Number of cached results.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of results kept before the least recently used one is
    /// evicted.
    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }
}

impl<H: Clone> LookupCache<H> {
    /// Look up a cached result. Updates hit/miss stats.
    pub fn get(&mut self, method: &str, request_uri: &str, url_path: &str) -> Option<LookupResult<H>> {
        let key = CacheKey::new(method, request_uri, url_path);
        if let Some(result) = self.entries.get(&key) {
            self.stats.hits += 1;
            trace_log!("Lookup cache hit for {} {}", method, request_uri);
            Some(result.clone())
        } else {
            self.stats.misses += 1;
            trace_log!("Lookup cache miss for {} {}", method, request_uri);
            None
        }
    }

    /// Store a result, evicting the least recently used one when full.
    pub fn insert(
        &mut self,
        method: &str,
        request_uri: &str,
        url_path: &str,
        result: LookupResult<H>,
    ) {
        self.entries
            .push(CacheKey::new(method, request_uri, url_path), result);
    }
}

impl<H> Default for LookupCache<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Clone for LookupCache<H> {
    fn clone(&self) -> Self {
        Self {
            entries: LruCache::new(self.entries.cap()),
            owner: None,
            stats: self.stats.clone(),
        }
    }
}

impl<H> fmt::Debug for LookupCache<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LookupCache")
            .field("len", &self.entries.len())
            .field("capacity", &self.entries.cap())
            .field("owner", &self.owner)
            .field("stats", &self.stats)
            .finish()
    }
}

impl<H: Handler + Clone> Router<H> {
    /// [`lookup`](Self::lookup) through `cache`.
    pub fn lookup_cached(
        &self,
        cache: &mut LookupCache<H>,
        method: &str,
        request_uri: &str,
        url_path: &str,
    ) -> LookupResult<H> {
        cache.sync_owner(self.id(), self.generation());
        if let Some(result) = cache.get(method, request_uri, url_path) {
            return result;
        }
        let result = self.lookup(method, request_uri, url_path);
        cache.insert(method, request_uri, url_path, result.clone());
        result
    }
}

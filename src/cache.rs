//! Route resolution caching.
//!
//! This module provides [`RouteCache`], an LRU cache that remembers which
//! entry of the flat route index a path resolved to, so repeated navigation
//! to the same locations skips the linear scan. It is gated behind the
//! `cache` feature flag and uses the [`lru`] crate internally.
//!
//! Negative results are cached too: a path that matched nothing is stored as
//! `None`.
//!
//! [`CacheStats`] tracks hits, misses, and invalidations so you can monitor
//! cache effectiveness at runtime.
//!
//! # Examples
//!
//! ```
//! use shell_navigator::cache::RouteCache;
//!
//! let mut cache = RouteCache::new();
//! cache.insert("/users/42".to_string(), Some(3));
//!
//! assert_eq!(cache.get("/users/42"), Some(Some(3)));
//! assert_eq!(cache.get("/nowhere"), None);
//! assert_eq!(cache.stats().hits, 1);
//! assert_eq!(cache.stats().misses, 1);
//! ```

use crate::{debug_log, trace_log};
use lru::LruCache;
use std::num::NonZeroUsize;

/// Counters tracking cache hit/miss rates and invalidations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of lookups answered from the cache.
    pub hits: usize,
    /// Number of lookups that had to scan the index.
    pub misses: usize,
    /// Number of full cache invalidations (via [`RouteCache::clear`]).
    pub invalidations: usize,
}

impl CacheStats {
    /// Return the hit rate as a value in `0.0..=1.0`.
    ///
    /// Returns `0.0` if no lookups have been performed.
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache from normalized path to flat-index position.
///
/// Default capacity is 1000 entries.
#[derive(Debug)]
pub struct RouteCache {
    entries: LruCache<String, Option<usize>>,
    stats: CacheStats,
}

impl RouteCache {
    const DEFAULT_CAPACITY: usize = 1000;

    /// Create a cache with the default capacity (1000 entries).
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Create a cache with a custom capacity.
    ///
    /// A capacity of zero is raised to one.
    pub fn with_capacity(capacity: usize) -> Self {
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(cap),
            stats: CacheStats::default(),
        }
    }

    /// Look up the cached resolution for `path`.
    ///
    /// The outer `Option` is the cache hit; the inner one is the cached
    /// result (`None` when the path matched no route).
    pub fn get(&mut self, path: &str) -> Option<Option<usize>> {
        if let Some(entry) = self.entries.get(path) {
            self.stats.hits += 1;
            trace_log!("Route cache hit for path: '{}'", path);
            Some(*entry)
        } else {
            self.stats.misses += 1;
            trace_log!("Route cache miss for path: '{}'", path);
            None
        }
    }

    /// Remember how `path` resolved.
    pub fn insert(&mut self, path: String, index: Option<usize>) {
        trace_log!("Caching resolution {:?} for path '{}'", index, path);
        self.entries.put(path, index);
    }

    /// Drop every entry and increment the invalidation counter.
    pub fn clear(&mut self) {
        let len = self.entries.len();
        self.entries.clear();
        self.stats.invalidations += 1;
        debug_log!(
            "Route cache cleared: {} entries removed ({} total invalidations, hit rate: {:.1}%)",
            len,
            self.stats.invalidations,
            self.stats.hit_rate() * 100.0
        );
    }

    /// Number of cached paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current counters.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

impl Default for RouteCache {
    fn default() -> Self {
        Self::new()
    }
}

//! Resolution memoization.

use crate::resolver::ResolutionResult;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Cache counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that fell through to resolution
    pub misses: u64,
    /// Entries held
    pub entries: usize,
}

/// (tenant, feature) → result cache.
///
/// Concurrent first-time population of a key only causes redundant
/// recomputation; the last insert wins with an identical value.
#[derive(Debug, Default)]
pub struct ResolutionCache {
    entries: DashMap<(String, String), ResolutionResult>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResolutionCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached result for the pair, counting the hit or miss
    pub fn get(&self, tenant_id: &str, feature: &str) -> Option<ResolutionResult> {
        let key = (tenant_id.to_string(), feature.to_string());
        match self.entries.get(&key) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(entry.value().clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Store a result under its own (tenant, feature) pair
    pub fn insert(&self, result: ResolutionResult) {
        let key = (result.tenant_id.clone(), result.feature.clone());
        self.entries.insert(key, result);
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries and reset the counters
    pub fn clear(&self) {
        self.entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Snapshot of the counters
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }
}

//! Memoizing cache for computed responses.
//!
//! Every engine operation is a pure function of its request and config, so
//! a response can be reused whenever the canonical request text matches.
//! Changing any task field (cost, duration, dependency, inclusion) changes
//! the canonical text and therefore the key.

use rustc_hash::{FxHashMap, FxHasher};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::hash::{Hash, Hasher};

/// The operation a cached response belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OperationKind {
    CriticalPath,
    Timeline,
    PriorityScore,
    BudgetOptimization,
    Plan,
}

struct CacheEntry {
    canonical: String,
    response: String,
}

/// Bounded response cache with FIFO eviction.
pub struct ResultCache {
    entries: FxHashMap<u64, CacheEntry>,
    /// Keys in insertion order, oldest first.
    order: VecDeque<u64>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl ResultCache {
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Create a cache holding at most `capacity` responses (0 disables caching).
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            order: VecDeque::with_capacity(capacity),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    /// Hash of `(operation kind, canonical request)`.
    pub fn key(kind: OperationKind, canonical: &str) -> u64 {
        let mut hasher = FxHasher::default();
        kind.hash(&mut hasher);
        canonical.hash(&mut hasher);
        hasher.finish()
    }

    /// Return the cached response for `canonical`, computing and storing it
    /// on a miss. Errors are returned as-is and never cached.
    ///
    /// A key collision with a different canonical request counts as a miss
    /// and replaces the stored entry.
    pub fn get_or_try_insert_with<E, F>(
        &mut self,
        kind: OperationKind,
        canonical: &str,
        compute: F,
    ) -> Result<String, E>
    where
        F: FnOnce() -> Result<String, E>,
    {
        let key = Self::key(kind, canonical);
        if let Some(entry) = self.entries.get(&key) {
            if entry.canonical == canonical {
                self.hits += 1;
                return Ok(entry.response.clone());
            }
        }

        self.misses += 1;
        let response = compute()?;
        self.insert(key, canonical, &response);
        Ok(response)
    }

    fn insert(&mut self, key: u64, canonical: &str, response: &str) {
        if self.capacity == 0 {
            return;
        }
        let entry = CacheEntry {
            canonical: canonical.to_string(),
            response: response.to_string(),
        };
        if self.entries.insert(key, entry).is_some() {
            return;
        }
        self.order.push_back(key);
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }

    /// Drop every cached response. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

//! Compiled formula cache
//!
//! Formulas authored as data are typically parsed once and evaluated many
//! times from many places. The cache hands out shared [`Formula`] handles
//! keyed by formula text and variable list, and is safe to use from any
//! number of threads. It holds at most `capacity` entries and evicts the
//! least recently used one to make room.

use crate::error::FormulaResult;
use crate::formula::Formula;
use crate::parser::FormulaParser;
use dashmap::DashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::trace;

/// Entries kept by [`FormulaCache::new`]
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    formula: String,
    variables: Vec<String>,
}

#[derive(Debug)]
struct CacheEntry {
    formula: Arc<Formula>,
    last_access: AtomicUsize,
}

/// Snapshot of cache counters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: usize,
    pub misses: usize,
    pub evictions: usize,
    pub hit_rate: f64,
}

/// Thread-safe, capacity-bounded cache of compiled formulas. Failed
/// compilations are not cached. Concurrent inserts may briefly overshoot
/// the capacity by the number of racing threads.
#[derive(Debug)]
pub struct FormulaCache {
    parser: FormulaParser,
    capacity: usize,
    entries: DashMap<CacheKey, CacheEntry>,
    access_counter: AtomicUsize,
    hits: AtomicUsize,
    misses: AtomicUsize,
    evictions: AtomicUsize,
}

impl Default for FormulaCache {
    fn default() -> Self {
        Self::new(FormulaParser::default())
    }
}

impl FormulaCache {
    pub fn new(parser: FormulaParser) -> Self {
        Self::with_capacity(parser, DEFAULT_CACHE_CAPACITY)
    }

    /// Cache holding at most `capacity` formulas. Zero disables caching.
    pub fn with_capacity(parser: FormulaParser, capacity: usize) -> Self {
        Self {
            parser,
            capacity,
            entries: DashMap::new(),
            access_counter: AtomicUsize::new(0),
            hits: AtomicUsize::new(0),
            misses: AtomicUsize::new(0),
            evictions: AtomicUsize::new(0),
        }
    }

    /// Return the cached formula or compile and store it
    pub fn get_or_compile<S: AsRef<str>>(
        &self,
        formula: &str,
        variables: &[S],
    ) -> FormulaResult<Arc<Formula>> {
        let key = CacheKey {
            formula: formula.to_string(),
            variables: variables.iter().map(|name| name.as_ref().to_string()).collect(),
        };

        if let Some(cached) = self.entries.get(&key) {
            cached.last_access.store(self.tick(), Ordering::Relaxed);
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(&cached.formula));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let compiled = Arc::new(self.parser.compile(formula, key.variables.as_slice())?);
        if self.capacity == 0 {
            return Ok(compiled);
        }

        while self.entries.len() >= self.capacity {
            if !self.evict_lru() {
                break;
            }
        }
        trace!(formula, "Cached compiled formula");

        // Another thread may have compiled the same key in the meantime; keep the first.
        let entry = CacheEntry { formula: compiled, last_access: AtomicUsize::new(self.tick()) };
        let stored = self.entries.entry(key).or_insert(entry);
        Ok(Arc::clone(&stored.formula))
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop all entries and reset counters
    pub fn clear(&self) {
        self.entries.clear();
        self.access_counter.store(0, Ordering::Relaxed);
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        let hit_rate = if total == 0 { 0.0 } else { hits as f64 / total as f64 };
        CacheStats {
            entries: self.entries.len(),
            capacity: self.capacity,
            hits,
            misses,
            evictions: self.evictions.load(Ordering::Relaxed),
            hit_rate,
        }
    }

    fn tick(&self) -> usize {
        self.access_counter.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Remove the entry with the oldest access. Returns false when empty.
    fn evict_lru(&self) -> bool {
        // Scan first and remove after, so no shard guard is held during removal
        let oldest = self
            .entries
            .iter()
            .min_by_key(|entry| entry.value().last_access.load(Ordering::Relaxed))
            .map(|entry| entry.key().clone());

        let Some(key) = oldest else {
            return false;
        };
        if self.entries.remove(&key).is_some() {
            self.evictions.fetch_add(1, Ordering::Relaxed);
            trace!(formula = %key.formula, "Evicted least recently used formula");
        }
        true
    }
}

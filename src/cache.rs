//! Operation memoization (the computed table).
//!
//! Backed by [`HashMap`]: no collisions, automatic resizing, O(n) clear.
//! The engine flushes the whole cache whenever a node is reclaimed, because
//! an entry may name a dead identity as key or value and a reused slot must
//! never satisfy a stale lookup.

use std::collections::HashMap;
use std::hash::Hash;

pub struct Cache<K, V> {
    map: HashMap<K, V>,
    hits: usize,
    misses: usize,
}

impl<K, V> Cache<K, V> {
    /// Create a new cache pre-sized for `2^bits` entries.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Bits should be in the range 0..=31");
        Self {
            map: HashMap::with_capacity(1 << bits),
            hits: 0,
            misses: 0,
        }
    }

    /// Get the number of entries in the cache.
    pub fn len(&self) -> usize {
        self.map.len()
    }
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Get the number of cache hits.
    pub fn hits(&self) -> usize {
        self.hits
    }
    /// Get the number of cache misses.
    pub fn misses(&self) -> usize {
        self.misses
    }

    /// Drop all entries, keeping the hit/miss counters.
    pub fn clear(&mut self) {
        self.map.clear();
    }
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq,
    V: Copy,
{
    /// Get the cached result.
    pub fn get(&mut self, key: &K) -> Option<V> {
        match self.map.get(key) {
            Some(&value) => {
                self.hits += 1;
                Some(value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Insert a result into the cache.
    pub fn insert(&mut self, key: K, value: V) {
        self.map.insert(key, value);
    }
}

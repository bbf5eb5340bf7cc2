//! LRU (Least Recently Used) cache implementation
//!
//! An AHash index maps each key to its slot in the recency sequence, so
//! lookups, promotion and eviction never traverse the list.

use std::collections::HashMap;
use std::hash::Hash;
use ahash::RandomState;

use crate::error::{Error, Result};
use crate::sequence::RecencySequence;

/// Capacity used by `LruCache::default()`
pub const DEFAULT_CAPACITY: usize = 10;

/// LRU cache with fixed capacity
pub struct LruCache<K, V> {
    map: HashMap<K, usize, RandomState>,
    order: RecencySequence<K, V>,
    capacity: usize,
}

impl<K, V> LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    /// Create a new LRU cache with the given capacity
    ///
    /// # Errors
    /// * `Error::InvalidCapacity` - if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity(capacity));
        }
        Ok(Self::with_checked_capacity(capacity))
    }

    fn with_checked_capacity(capacity: usize) -> Self {
        Self {
            map: HashMap::with_capacity_and_hasher(capacity, RandomState::new()),
            order: RecencySequence::with_capacity(capacity),
            capacity,
        }
    }

    /// Get a value and mark it most-recently used
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.order.promote(idx);
        self.order.get(idx).map(|(_, value)| value)
    }

    /// Get a mutable value and mark it most-recently used
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let idx = *self.map.get(key)?;
        self.order.promote(idx);
        self.order.get_mut(idx)
    }

    /// Get a value without touching its recency
    pub fn peek(&self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.order.get(idx).map(|(_, value)| value)
    }

    /// Check membership without touching recency
    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Insert or overwrite a key-value pair
    pub fn put(&mut self, key: K, value: V) {
        self.push(key, value);
    }

    /// Insert or overwrite a key-value pair, returning the entry evicted to
    /// make room for it
    pub fn push(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&idx) = self.map.get(&key) {
            // Update existing
            if let Some(slot) = self.order.get_mut(idx) {
                *slot = value;
            }
            self.order.promote(idx);
            return None;
        }

        let evicted = if self.order.len() >= self.capacity {
            self.evict()
        } else {
            None
        };

        let idx = self.order.push_most_recent(key.clone(), value);
        self.map.insert(key, idx);
        debug_assert_eq!(self.map.len(), self.order.len());

        evicted
    }

    /// Remove a key from the cache
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let idx = self.map.remove(key)?;
        self.order.remove(idx).map(|(_, value)| value)
    }

    /// Remove and return the least-recently used entry
    pub fn pop_lru(&mut self) -> Option<(K, V)> {
        if self.order.is_empty() {
            return None;
        }
        self.evict()
    }

    /// Least-recently used entry, i.e. the next one to be evicted
    pub fn peek_lru(&self) -> Option<(&K, &V)> {
        self.order.peek_least_recent()
    }

    /// Iterate entries from most- to least-recently used
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.order.iter()
    }

    /// Get the current size of the cache
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Clear the cache
    pub fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }

    fn evict(&mut self) -> Option<(K, V)> {
        debug_assert!(!self.order.is_empty(), "evict on empty cache");
        let (key, value) = self.order.pop_least_recent().ok()?;
        self.map.remove(&key);
        Some((key, value))
    }
}

impl<K, V> Default for LruCache<K, V>
where
    K: Hash + Eq + Clone,
{
    fn default() -> Self {
        Self::with_checked_capacity(DEFAULT_CAPACITY)
    }
}

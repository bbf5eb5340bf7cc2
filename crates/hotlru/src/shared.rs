//! SharedCache: LruCache behind a single lock, with statistics

use std::hash::Hash;
use parking_lot::Mutex;
use tracing::debug;

use crate::error::Result;
use crate::lru::{LruCache, DEFAULT_CAPACITY};
use crate::stats::CacheStats;

/// Thread-safe handle around an [`LruCache`].
///
/// Every operation takes the one mutex for its whole duration, so `get` and
/// `put` are atomic with respect to each other. Values are cloned out on
/// `get` because the lock cannot outlive the call.
pub struct SharedCache<K, V> {
    /// LRU cache for hot data
    cache: Mutex<LruCache<K, V>>,

    /// Cache statistics
    stats: CacheStats,
}

impl<K, V> SharedCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Create a new SharedCache with the given capacity
    ///
    /// # Errors
    /// * `Error::InvalidCapacity` - if `capacity` is 0
    pub fn new(capacity: usize) -> Result<Self> {
        let cache = LruCache::new(capacity)?;
        debug!(capacity, "created shared LRU cache");
        Ok(Self::from_cache(cache))
    }

    fn from_cache(cache: LruCache<K, V>) -> Self {
        Self {
            cache: Mutex::new(cache),
            stats: CacheStats::new(),
        }
    }

    /// Get a copy of a value, marking it most-recently used
    pub fn get(&self, key: &K) -> Option<V> {
        let mut cache = self.cache.lock();
        match cache.get(key) {
            Some(value) => {
                self.stats.record_hit();
                Some(value.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Insert or overwrite a value
    pub fn put(&self, key: K, value: V) {
        let mut cache = self.cache.lock();
        if cache.contains(&key) {
            cache.put(key, value);
            self.stats.record_update();
            return;
        }

        self.stats.record_insert();
        if cache.push(key, value).is_some() {
            self.stats.record_eviction();
            debug!(len = cache.len(), "evicted least-recently used entry");
        }
    }

    /// Remove a key, returning its value
    pub fn remove(&self, key: &K) -> Option<V> {
        self.cache.lock().remove(key)
    }

    /// Check membership without touching recency
    pub fn contains(&self, key: &K) -> bool {
        self.cache.lock().contains(key)
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Get current cache size
    pub fn len(&self) -> usize {
        self.cache.lock().len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.lock().is_empty()
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.cache.lock().capacity()
    }

    /// Clear the cache and reset statistics
    pub fn clear(&self) {
        let mut cache = self.cache.lock();
        cache.clear();
        self.stats.reset();
    }
}

impl<K, V> Default for SharedCache<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    fn default() -> Self {
        debug!(capacity = DEFAULT_CAPACITY, "created shared LRU cache");
        Self::from_cache(LruCache::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_cache_basic() {
        let cache = SharedCache::new(10).unwrap();

        cache.put(1u64, b"test data".to_vec());
        let data = cache.get(&1).unwrap();

        assert_eq!(data, b"test data");
        assert_eq!(cache.stats().hits(), 1);
        assert_eq!(cache.stats().misses(), 0);
        assert_eq!(cache.stats().inserts(), 1);
    }

    #[test]
    fn test_cache_invalid_capacity() {
        let result = SharedCache::<u64, u64>::new(0);
        assert!(matches!(result, Err(Error::InvalidCapacity(0))));
    }

    #[test]
    fn test_cache_eviction() {
        let cache = SharedCache::new(2).unwrap();

        cache.put("A", 1);
        cache.put("B", 2);
        assert_eq!(cache.get(&"A"), Some(1));
        cache.put("C", 3);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&"B"), None);
        assert_eq!(cache.get(&"A"), Some(1));
        assert_eq!(cache.get(&"C"), Some(3));

        assert_eq!(cache.stats().evictions(), 1);
        assert_eq!(cache.stats().hits(), 3);
        assert_eq!(cache.stats().misses(), 1);
    }

    #[test]
    fn test_cache_overwrite_counts_update() {
        let cache = SharedCache::new(2).unwrap();

        cache.put(1, "v1");
        cache.put(1, "v2");

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&1), Some("v2"));
        assert_eq!(cache.stats().inserts(), 1);
        assert_eq!(cache.stats().updates(), 1);
        assert_eq!(cache.stats().evictions(), 0);
    }

    #[test]
    fn test_cache_remove() {
        let cache = SharedCache::new(10).unwrap();

        cache.put(1, "a");
        assert_eq!(cache.remove(&1), Some("a"));
        assert!(!cache.contains(&1));
        assert_eq!(cache.get(&1), None);
    }

    #[test]
    fn test_cache_clear() {
        let cache = SharedCache::new(10).unwrap();

        cache.put(0, "data 0");
        cache.put(1, "data 1");
        cache.get(&0);

        assert_eq!(cache.len(), 2);

        cache.clear();

        assert!(cache.is_empty());
        assert_eq!(cache.stats().hits(), 0);
        assert_eq!(cache.capacity(), 10);
    }

    #[test]
    fn test_cache_default() {
        let cache: SharedCache<u32, u32> = SharedCache::default();
        assert_eq!(cache.capacity(), DEFAULT_CAPACITY);
    }

    #[test]
    fn test_cache_concurrent_access() {
        let cache = Arc::new(SharedCache::new(64).unwrap());

        let handles: Vec<_> = (0..4u64)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..1000u64 {
                        let key = (t * 1000 + i) % 128;
                        cache.put(key, key * 2);
                        if let Some(value) = cache.get(&key) {
                            assert_eq!(value, key * 2);
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(cache.len() <= 64);
        let stats = cache.stats();
        assert_eq!(stats.hits() + stats.misses(), 4000);
        assert_eq!(stats.inserts() + stats.updates(), 4000);
    }
}

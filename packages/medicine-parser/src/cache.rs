//! Bounded least-recently-used cache keyed on the exact raw name.

use std::sync::Mutex;

use indexmap::IndexMap;

/// Thread-safe LRU cache.
///
/// Entries are kept in recency order: the front of the map is the least
/// recently used. A capacity of zero disables caching.
pub struct LruCache<V> {
    capacity: usize,
    entries: Mutex<IndexMap<String, V>>,
}

impl<V: Clone> LruCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(IndexMap::with_capacity(capacity.min(1024))),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up `key`, marking it most recently used.
    pub fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().ok()?;
        let index = entries.get_index_of(key)?;
        let last = entries.len() - 1;
        entries.move_index(index, last);
        entries.get_index(last).map(|(_, value)| value.clone())
    }

    /// Insert or refresh `key`, evicting the least recently used entries
    /// beyond capacity.
    pub fn insert(&self, key: impl Into<String>, value: V) {
        if self.capacity == 0 {
            return;
        }
        let Ok(mut entries) = self.entries.lock() else {
            return;
        };

        let (index, _) = entries.insert_full(key.into(), value);
        let last = entries.len() - 1;
        entries.move_index(index, last);

        while entries.len() > self.capacity {
            entries.shift_remove_index(0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = LruCache::new(2);
        cache.insert("a", 1);
        cache.insert("b", 2);

        // Touch "a" so "b" becomes the eviction candidate.
        assert_eq!(cache.get("a"), Some(1));
        cache.insert("c", 3);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get("b"), None);
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("c"), Some(3));
    }

    #[test]
    fn test_reinsert_refreshes_value() {
        let cache = LruCache::new(2);
        cache.insert("a", 1);
        cache.insert("a", 10);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("a"), Some(10));
    }

    #[test]
    fn test_hits_and_refreshes_reorder_in_place() {
        let cache = LruCache::new(3);
        cache.insert("a", 1);
        cache.insert("b", 2);
        cache.insert("c", 3);

        // Order is now b, c, a
        assert_eq!(cache.get("a"), Some(1));
        // Order is now c, a, b
        cache.insert("b", 20);

        cache.insert("d", 4);
        assert_eq!(cache.get("c"), None);
        assert_eq!(cache.get("a"), Some(1));
        assert_eq!(cache.get("b"), Some(20));
        assert_eq!(cache.get("d"), Some(4));
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_keys_are_exact() {
        let cache = LruCache::new(4);
        cache.insert("Aspirin 75mg", 1);
        assert_eq!(cache.get("aspirin 75mg"), None);
        assert_eq!(cache.get("Aspirin 75mg "), None);
    }

    #[test]
    fn test_zero_capacity_disables() {
        let cache = LruCache::new(0);
        cache.insert("a", 1);
        assert!(cache.is_empty());
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn test_concurrent_inserts_stay_bounded() {
        let cache = std::sync::Arc::new(LruCache::new(8));
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let cache = cache.clone();
                std::thread::spawn(move || {
                    for i in 0..50 {
                        cache.insert(format!("{}-{}", t, i), i);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(cache.len(), 8);
    }
}

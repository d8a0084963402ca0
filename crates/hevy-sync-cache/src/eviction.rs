//! Memory-tier eviction.
//!
//! The memory tier's eviction policy is fixed to FIFO by first-insertion
//! order — a single strategy rather than a pluggable `EvictionPolicy`
//! (LRU/LFU/FIFO).

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;

/// Bounded FIFO map: eviction removes the earliest-inserted entry, not the
/// least-recently-accessed one. Re-inserting an existing key updates its
/// value in place without moving it in eviction order.
pub(crate) struct FifoStore<K, V> {
    data: HashMap<K, V>,
    order: VecDeque<K>,
    capacity: usize,
}

impl<K: Hash + Eq + Clone, V> FifoStore<K, V> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            data: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub(crate) fn get(&self, key: &K) -> Option<&V> {
        self.data.get(key)
    }

    /// Inserts a value, evicting the oldest entry if the map is at capacity
    /// and `key` is new. Returns the evicted `(key, value)` pair, if any.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        if self.data.contains_key(&key) {
            self.data.insert(key, value);
            return None;
        }

        let evicted = if self.data.len() >= self.capacity {
            self.order.pop_front().and_then(|old_key| {
                let evicted_value = self.data.remove(&old_key)?;
                Some((old_key, evicted_value))
            })
        } else {
            None
        };

        self.data.insert(key.clone(), value);
        self.order.push_back(key);

        evicted
    }

    pub(crate) fn remove(&mut self, key: &K) -> Option<V> {
        self.order.retain(|k| k != key);
        self.data.remove(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = &K> {
        self.order.iter()
    }

    pub(crate) fn clear(&mut self) {
        self.data.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_first() {
        let mut store = FifoStore::new(2);
        store.insert("a", 1);
        store.insert("b", 2);

        // Accessing "a" must not protect it from FIFO eviction.
        assert_eq!(store.get(&"a"), Some(&1));

        let evicted = store.insert("c", 3);
        assert_eq!(evicted, Some(("a", 1)));
        assert_eq!(store.get(&"a"), None);
        assert_eq!(store.get(&"b"), Some(&2));
        assert_eq!(store.get(&"c"), Some(&3));
    }

    #[test]
    fn reinsert_updates_value_without_reordering() {
        let mut store = FifoStore::new(2);
        store.insert("a", 1);
        store.insert("b", 2);
        store.insert("a", 10);

        let evicted = store.insert("c", 3);
        assert_eq!(evicted, Some(("a", 10)));
    }

    #[test]
    fn never_exceeds_capacity() {
        let mut store = FifoStore::new(3);
        for i in 0..10 {
            store.insert(i, i);
        }
        assert!(store.len() <= 3);
    }

    use proptest::prelude::*;

    proptest! {
        #[test]
        fn cardinality_never_exceeds_capacity(
            capacity in 1usize..8,
            keys in proptest::collection::vec(0u32..12, 0..200),
        ) {
            let mut store = FifoStore::new(capacity);
            for key in keys {
                store.insert(key, ());
                prop_assert!(store.len() <= capacity);
            }
        }
    }
}

//! Memory-tier store: the bounded half of the two-tier response cache.

use crate::eviction::FifoStore;
use std::hash::Hash;

/// Thin wrapper over [`FifoStore`] exposing just what the memory tier needs.
pub(crate) struct MemoryStore<K, V> {
    inner: FifoStore<K, V>,
}

impl<K: Hash + Eq + Clone, V: Clone> MemoryStore<K, V> {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            inner: FifoStore::new(capacity),
        }
    }

    pub(crate) fn get(&self, key: &K) -> Option<V> {
        self.inner.get(key).cloned()
    }

    /// Inserts a value, returning `true` if an existing entry was evicted.
    pub(crate) fn insert(&mut self, key: K, value: V) -> bool {
        self.inner.insert(key, value).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.len()
    }

    pub(crate) fn keys(&self) -> Vec<K> {
        self.inner.keys().cloned().collect()
    }

    pub(crate) fn clear(&mut self) {
        self.inner.clear();
    }
}

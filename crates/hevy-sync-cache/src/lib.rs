//! Two-tier response cache.
//!
//! A bounded, FIFO-evicted memory tier sits in front of an unbounded,
//! TTL-expiring [`hevy_sync_core::DurableStore`] tier. Only successful GET
//! responses are ever written here — enforcing that rule is the Resilient
//! Client's job (it's the only caller that knows the HTTP method), so this
//! crate just stores whatever [`serde_json::Value`] it's given.

mod config;
mod error;
mod events;
mod store;

pub use config::CacheConfig;
pub use error::CacheError;
pub use events::CacheEvent;

use hevy_sync_core::DurableStore;
use std::sync::{Arc, Mutex};
use std::time::Instant;
use store::MemoryStore;

#[cfg(feature = "metrics")]
use metrics::counter;

/// Canonical identity of a cacheable GET: the path plus its query parameters
/// sorted by key, so `?b=2&a=1` and `?a=1&b=2` collide to the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint {
    path: String,
    query: Vec<(String, String)>,
}

impl Fingerprint {
    pub fn new(path: impl Into<String>, query: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut query: Vec<(String, String)> = query.into_iter().collect();
        query.sort();
        Self { path: path.into(), query }
    }

    /// Canonical string key used by both the memory and durable tiers.
    pub fn key(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let mut key = self.path.clone();
        key.push('?');
        key.push_str(
            &self
                .query
                .iter()
                .map(|(k, v)| format!("{k}={v}"))
                .collect::<Vec<_>>()
                .join("&"),
        );
        key
    }
}

/// The two-tier cache itself.
pub struct ResponseCache<D: DurableStore> {
    config: CacheConfig,
    durable: Arc<D>,
    memory: Mutex<MemoryStore<String, serde_json::Value>>,
}

impl<D: DurableStore> ResponseCache<D> {
    pub fn new(config: CacheConfig, durable: Arc<D>) -> Self {
        let memory = Mutex::new(MemoryStore::new(config.max_size));
        Self { config, durable, memory }
    }

    /// Looks up a fingerprint. Memory hit returns immediately; a durable hit
    /// repopulates memory before returning; a miss on both tiers (or a
    /// corrupt durable entry, which is evicted) returns `None`.
    pub async fn get(&self, fp: &Fingerprint) -> Option<serde_json::Value> {
        let key = fp.key();

        if let Some(value) = self.memory.lock().unwrap().get(&key) {
            self.emit_hit(&key);
            return Some(value);
        }

        let Some(bytes) = self.durable.get(&key).await else {
            self.emit_miss(&key);
            return None;
        };

        match serde_json::from_slice::<serde_json::Value>(&bytes) {
            Ok(value) => {
                let evicted = self.memory.lock().unwrap().insert(key.clone(), value.clone());
                self.emit_repopulated(&key);
                if evicted {
                    self.emit_eviction(&key);
                }
                Some(value)
            }
            Err(_) => {
                self.durable.remove(&key).await;
                self.emit_miss(&key);
                None
            }
        }
    }

    /// Stores a payload under `fp`. Writes through to the durable tier with
    /// the configured TTL; a durable write failure is logged, never fatal,
    /// since the memory tier already has the fresh value.
    pub async fn put(&self, fp: &Fingerprint, payload: serde_json::Value) {
        let key = fp.key();

        let evicted = self.memory.lock().unwrap().insert(key.clone(), payload.clone());
        if evicted {
            self.emit_eviction(&key);
        }

        match serde_json::to_vec(&payload) {
            Ok(bytes) => {
                self.durable.put(&key, bytes, self.config.ttl).await;
            }
            Err(_err) => {
                self.emit_durable_write_failed(&key);
            }
        }
    }

    /// Drops all memory entries and best-effort removes their durable
    /// counterparts, plus any caller-supplied extra keys (e.g. the
    /// rate-limit snapshot key). Orphaned durable entries
    /// outside the current memory set age out by TTL rather than being
    /// enumerated, since the durable tier isn't globally listable.
    pub async fn clear(&self, extra_durable_keys: &[&str]) {
        let keys = {
            let mut memory = self.memory.lock().unwrap();
            let keys = memory.keys();
            memory.clear();
            keys
        };

        for key in keys.iter().cloned().chain(extra_durable_keys.iter().map(|s| s.to_string())) {
            self.durable.remove(&key).await;
        }
    }

    pub fn len(&self) -> usize {
        self.memory.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn emit_hit(&self, key: &str) {
        self.config.event_listeners.emit(&CacheEvent::Hit {
            pattern_name: self.config.name.clone(),
            timestamp: Instant::now(),
            key: key.to_string(),
        });
        #[cfg(feature = "metrics")]
        counter!("cache_hits_total", "cache" => self.config.name.clone()).increment(1);
    }

    fn emit_miss(&self, key: &str) {
        self.config.event_listeners.emit(&CacheEvent::Miss {
            pattern_name: self.config.name.clone(),
            timestamp: Instant::now(),
            key: key.to_string(),
        });
        #[cfg(feature = "metrics")]
        counter!("cache_misses_total", "cache" => self.config.name.clone()).increment(1);
    }

    fn emit_eviction(&self, key: &str) {
        #[cfg(feature = "tracing")]
        tracing::debug!(cache = %self.config.name, %key, "evicting cache entry");

        self.config.event_listeners.emit(&CacheEvent::Eviction {
            pattern_name: self.config.name.clone(),
            timestamp: Instant::now(),
            key: key.to_string(),
        });
        #[cfg(feature = "metrics")]
        counter!("cache_evictions_total", "cache" => self.config.name.clone()).increment(1);
    }

    fn emit_repopulated(&self, key: &str) {
        self.config.event_listeners.emit(&CacheEvent::DurableRepopulated {
            pattern_name: self.config.name.clone(),
            timestamp: Instant::now(),
            key: key.to_string(),
        });
    }

    fn emit_durable_write_failed(&self, key: &str) {
        #[cfg(feature = "tracing")]
        tracing::warn!(cache = %self.config.name, %key, "durable cache write failed");

        self.config.event_listeners.emit(&CacheEvent::DurableWriteFailed {
            pattern_name: self.config.name.clone(),
            timestamp: Instant::now(),
            key: key.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hevy_sync_core::durable::in_memory::InMemoryDurableStore;
    use hevy_sync_core::TestClock;
    use serde_json::json;
    use std::time::Duration;

    fn cache() -> ResponseCache<InMemoryDurableStore<TestClock>> {
        let clock = Arc::new(TestClock::default());
        let durable = Arc::new(InMemoryDurableStore::new(clock));
        ResponseCache::new(CacheConfig::new("test", 2, Duration::from_secs(60)), durable)
    }

    #[test]
    fn fingerprint_sorts_query_params() {
        let a = Fingerprint::new("/x", vec![("b".into(), "2".into()), ("a".into(), "1".into())]);
        let b = Fingerprint::new("/x", vec![("a".into(), "1".into()), ("b".into(), "2".into())]);
        assert_eq!(a.key(), b.key());
        assert_eq!(a.key(), "/x?a=1&b=2");
    }

    #[tokio::test]
    async fn miss_then_hit() {
        let cache = cache();
        let fp = Fingerprint::new("/x", vec![]);
        assert_eq!(cache.get(&fp).await, None);

        cache.put(&fp, json!({"ok": true})).await;
        assert_eq!(cache.get(&fp).await, Some(json!({"ok": true})));
    }

    #[tokio::test]
    async fn memory_capacity_is_never_exceeded() {
        let cache = cache();
        for i in 0..5 {
            let fp = Fingerprint::new(format!("/x{i}"), vec![]);
            cache.put(&fp, json!(i)).await;
        }
        assert!(cache.len() <= 2);
    }

    #[tokio::test]
    async fn durable_hit_repopulates_memory() {
        let cache = cache();
        let fp = Fingerprint::new("/x", vec![]);
        cache.put(&fp, json!("v")).await;

        // Evict from memory by filling past capacity, but durable tier keeps it.
        cache.put(&Fingerprint::new("/y", vec![]), json!(1)).await;
        cache.put(&Fingerprint::new("/z", vec![]), json!(2)).await;
        assert_eq!(cache.memory.lock().unwrap().get(&fp.key()), None);

        assert_eq!(cache.get(&fp).await, Some(json!("v")));
        assert_eq!(cache.memory.lock().unwrap().get(&fp.key()), Some(json!("v")));
    }

    #[tokio::test]
    async fn clear_drops_memory_and_durable() {
        let cache = cache();
        let fp = Fingerprint::new("/x", vec![]);
        cache.put(&fp, json!("v")).await;

        cache.clear(&["extra-key"]).await;
        assert_eq!(cache.len(), 0);
        assert_eq!(cache.get(&fp).await, None);
    }
}

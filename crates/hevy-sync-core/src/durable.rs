//! Durable key/value store abstraction.
//!
//! Distinct from the host's plain property store: this trait additionally
//! carries a TTL per entry, because the response cache and rate-limit
//! tracker both need expiring durable entries and the host's property
//! store interface has no such concept. A host environment that
//! only offers string properties can still implement this by embedding an
//! expiry timestamp alongside the serialized value.

use async_trait::async_trait;
use std::time::Duration;

/// A durable tier behind the in-memory caches.
#[async_trait]
pub trait DurableStore: Send + Sync {
    /// Reads a value. Returns `None` on miss or on expiry.
    async fn get(&self, key: &str) -> Option<Vec<u8>>;

    /// Writes a value with the given time-to-live.
    async fn put(&self, key: &str, value: Vec<u8>, ttl: Duration);

    /// Removes a value if present. Never errors: a missing key is a no-op.
    async fn remove(&self, key: &str);
}

/// An in-memory [`DurableStore`] used in tests and for hosts with no durable
/// backend of their own.
pub mod in_memory {
    use super::*;
    use crate::clock::Clock;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Instant;
    use tokio::sync::Mutex;

    struct Entry {
        value: Vec<u8>,
        expires_at: Instant,
    }

    /// A `DurableStore` backed by a mutex-guarded hash map, with expiry
    /// checked against an injected [`Clock`].
    pub struct InMemoryDurableStore<C: Clock> {
        clock: Arc<C>,
        entries: Mutex<HashMap<String, Entry>>,
    }

    impl<C: Clock> InMemoryDurableStore<C> {
        pub fn new(clock: Arc<C>) -> Self {
            Self {
                clock,
                entries: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl<C: Clock> DurableStore for InMemoryDurableStore<C> {
        async fn get(&self, key: &str) -> Option<Vec<u8>> {
            let mut entries = self.entries.lock().await;
            match entries.get(key) {
                Some(entry) if entry.expires_at > self.clock.now_instant() => {
                    Some(entry.value.clone())
                }
                Some(_) => {
                    entries.remove(key);
                    None
                }
                None => None,
            }
        }

        async fn put(&self, key: &str, value: Vec<u8>, ttl: Duration) {
            let expires_at = self.clock.now_instant() + ttl;
            self.entries
                .lock()
                .await
                .insert(key.to_string(), Entry { value, expires_at });
        }

        async fn remove(&self, key: &str) {
            self.entries.lock().await.remove(key);
        }
    }

}

//! Configuration for the two-tier response cache.

use crate::events::CacheEvent;
use hevy_sync_core::{EventListeners, SyncConfig};
use std::time::Duration;

/// Tunables for [`crate::ResponseCache`]: the in-memory tier's capacity
/// (`max_size`) and the durable tier's entry lifetime (`ttl`).
pub struct CacheConfig {
    pub(crate) name: String,
    pub(crate) max_size: usize,
    pub(crate) ttl: Duration,
    pub(crate) event_listeners: EventListeners<CacheEvent>,
}

impl CacheConfig {
    pub fn new(name: impl Into<String>, max_size: usize, ttl: Duration) -> Self {
        Self {
            name: name.into(),
            max_size,
            ttl,
            event_listeners: EventListeners::new(),
        }
    }

    /// Builds a config from the crate-wide tunables.
    pub fn from_sync_config(name: impl Into<String>, config: &SyncConfig) -> Self {
        Self::new(name, config.cache_max, config.cache_ttl)
    }

    pub fn with_listener<L>(mut self, listener: L) -> Self
    where
        L: hevy_sync_core::EventListener<CacheEvent> + 'static,
    {
        self.event_listeners.add(listener);
        self
    }
}

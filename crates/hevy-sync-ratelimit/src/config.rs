//! Configuration for the rate-limit tracker.

use crate::events::RateLimitEvent;
use hevy_sync_core::{EventListeners, SyncConfig};
use std::time::Duration;

/// Durable-store key the tracker's snapshot is persisted under.
pub const RATE_LIMIT_INFO_KEY: &str = "RATE_LIMIT_INFO";

/// Below this remaining/limit ratio, [`crate::RateLimitTracker::observe`]
/// emits a warning.
pub const LOW_BUDGET_RATIO: f64 = 0.10;

pub struct RateLimitConfig {
    pub(crate) name: String,
    pub(crate) snapshot_ttl: Duration,
    pub(crate) event_listeners: EventListeners<RateLimitEvent>,
}

impl RateLimitConfig {
    pub fn new(name: impl Into<String>, snapshot_ttl: Duration) -> Self {
        Self {
            name: name.into(),
            snapshot_ttl,
            event_listeners: EventListeners::new(),
        }
    }

    /// The snapshot shares the response cache's TTL.
    pub fn from_sync_config(name: impl Into<String>, config: &SyncConfig) -> Self {
        Self::new(name, config.cache_ttl)
    }

    pub fn with_listener<L>(mut self, listener: L) -> Self
    where
        L: hevy_sync_core::EventListener<RateLimitEvent> + 'static,
    {
        self.event_listeners.add(listener);
        self
    }
}

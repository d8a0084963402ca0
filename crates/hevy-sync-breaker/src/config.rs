use hevy_sync_core::EventListeners;
use std::time::Duration;

use crate::events::BreakerEvent;

/// Tunables for [`crate::CircuitBreaker`], pulled from [`hevy_sync_core::SyncConfig`]
/// at construction time rather than duplicated.
pub struct BreakerConfig {
    /// Identifies this breaker instance in events, logs, and metrics labels.
    pub name: String,
    /// Weighted-failure sum at or above which the breaker trips.
    pub failure_threshold: f64,
    /// How long an OPEN breaker waits before allowing a probe call (`RESET_MS`).
    pub reset_duration: Duration,
    pub(crate) event_listeners: EventListeners<BreakerEvent>,
}

impl BreakerConfig {
    pub fn new(name: impl Into<String>, failure_threshold: f64, reset_duration: Duration) -> Self {
        Self {
            name: name.into(),
            failure_threshold,
            reset_duration,
            event_listeners: EventListeners::new(),
        }
    }

    /// Registers a listener for breaker events (state transitions, rejections, …).
    pub fn with_listener<L>(mut self, listener: L) -> Self
    where
        L: hevy_sync_core::EventListener<BreakerEvent> + 'static,
    {
        self.event_listeners.add(listener);
        self
    }
}

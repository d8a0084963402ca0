use crate::events::OrchestratorEvent;
use hevy_sync_core::{EventListeners, SyncConfig};
use std::time::Duration;

/// Property-store key the resolved API key is read from.
pub const API_KEY_PROPERTY: &str = "HEVY_API_KEY";

pub struct OrchestratorConfig {
    pub(crate) name: String,
    pub lock_wait: Duration,
    pub max_execution_time: Duration,
    pub(crate) event_listeners: EventListeners<OrchestratorEvent>,
}

impl OrchestratorConfig {
    pub fn new(name: impl Into<String>, lock_wait: Duration, max_execution_time: Duration) -> Self {
        Self {
            name: name.into(),
            lock_wait,
            max_execution_time,
            event_listeners: EventListeners::new(),
        }
    }

    pub fn from_sync_config(name: impl Into<String>, config: &SyncConfig) -> Self {
        Self::new(name, config.lock_wait, config.max_execution_time)
    }

    pub fn with_listener<L>(mut self, listener: L) -> Self
    where
        L: hevy_sync_core::EventListener<OrchestratorEvent> + 'static,
    {
        self.event_listeners.add(listener);
        self
    }
}

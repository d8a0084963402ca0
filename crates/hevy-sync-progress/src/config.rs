//! Configuration for the progress tracker.

use crate::events::ProgressEvent;
use hevy_sync_core::{EventListeners, SyncConfig};
use std::time::Duration;

/// Durable key the import progress record is persisted under.
pub const IMPORT_PROGRESS_KEY: &str = "IMPORT_PROGRESS";

/// Durable key the active-import marker is persisted under.
pub const IMPORT_ACTIVE_KEY: &str = "IMPORT_ACTIVE";

pub struct ProgressConfig {
    pub(crate) name: String,
    pub(crate) heartbeat_interval: Duration,
    pub(crate) stale_after: Duration,
    pub(crate) event_listeners: EventListeners<ProgressEvent>,
}

impl ProgressConfig {
    pub fn new(name: impl Into<String>, heartbeat_interval: Duration, stale_after: Duration) -> Self {
        Self {
            name: name.into(),
            heartbeat_interval,
            stale_after,
            event_listeners: EventListeners::new(),
        }
    }

    pub fn from_sync_config(name: impl Into<String>, config: &SyncConfig) -> Self {
        Self::new(name, config.active_import_heartbeat, config.active_import_stale)
    }

    pub fn with_listener<L>(mut self, listener: L) -> Self
    where
        L: hevy_sync_core::EventListener<ProgressEvent> + 'static,
    {
        self.event_listeners.add(listener);
        self
    }
}

use crate::events::DeltaEvent;
use hevy_sync_core::{EventListeners, SyncConfig};
use std::time::Duration;

/// Property-store key for the delta import's watermark.
pub const LAST_WORKOUT_UPDATE_KEY: &str = "LAST_WORKOUT_UPDATE";

/// Tunables for [`crate::run_delta_import`] and
/// [`crate::run_bootstrap_import`], pulled from the crate-wide config.
pub struct DeltaConfig {
    pub(crate) name: String,
    pub workout_batch_size: usize,
    pub inter_page_delay: Duration,
    pub min_success_count: usize,
    pub failure_threshold_rate: f64,
    pub page_size: u32,
    pub max_pages: u32,
    /// How many rows elapse between cooperative cancellation checks inside
    /// the delete/apply phases' in-memory loops. Default 200, per spec.md §5.
    pub cancel_check_interval: usize,
    pub(crate) event_listeners: EventListeners<DeltaEvent>,
}

impl DeltaConfig {
    pub fn new(
        name: impl Into<String>,
        workout_batch_size: usize,
        inter_page_delay: Duration,
        min_success_count: usize,
        failure_threshold_rate: f64,
        page_size: u32,
        max_pages: u32,
    ) -> Self {
        Self {
            name: name.into(),
            workout_batch_size,
            inter_page_delay,
            min_success_count,
            failure_threshold_rate,
            page_size,
            max_pages,
            cancel_check_interval: 200,
            event_listeners: EventListeners::new(),
        }
    }

    pub fn from_sync_config(name: impl Into<String>, config: &SyncConfig) -> Self {
        let mut delta = Self::new(
            name,
            config.workout_batch_size,
            config.inter_page_delay,
            config.min_success_count,
            config.failure_threshold_rate,
            50,
            config.max_pages,
        );
        delta.cancel_check_interval = config.cancel_check_interval;
        delta
    }

    pub fn with_cancel_check_interval(mut self, interval: usize) -> Self {
        self.cancel_check_interval = interval;
        self
    }

    pub fn with_listener<L>(mut self, listener: L) -> Self
    where
        L: hevy_sync_core::EventListener<DeltaEvent> + 'static,
    {
        self.event_listeners.add(listener);
        self
    }
}

use hevy_sync_core::SyncConfig;
use std::time::Duration;

/// Tunables for [`crate::ResilientClient`], pulled from
/// [`hevy_sync_core::SyncConfig`] at construction time.
pub struct ClientConfig {
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub request_timeout: Duration,
    pub validation_timeout: Duration,
    pub max_retries: usize,
}

impl ClientConfig {
    pub fn from_sync_config(config: &SyncConfig) -> Self {
        Self {
            base_delay: config.base_delay,
            max_delay: config.max_delay,
            request_timeout: config.request_timeout,
            validation_timeout: config.validation_timeout,
            max_retries: config.max_retries,
        }
    }
}

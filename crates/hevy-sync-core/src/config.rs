//! Crate-wide tunables.
//!
//! One struct, one place. Individual components (breaker, cache, client,
//! orchestrator, delta) each borrow the fields they need rather than
//! redefining their own constants, so a host can override any tunable in
//! one spot.

use std::time::Duration;

/// All tunables, with their defaults.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub request_timeout: Duration,
    pub validation_timeout: Duration,
    pub max_retries: usize,
    pub failure_threshold: f64,
    pub reset_duration: Duration,
    pub cache_max: usize,
    pub cache_ttl: Duration,
    pub max_pages: u32,
    pub inter_page_delay: Duration,
    pub max_execution_time: Duration,
    pub active_import_heartbeat: Duration,
    pub active_import_stale: Duration,
    pub lock_wait: Duration,
    pub workout_batch_size: usize,
    pub min_success_count: usize,
    pub failure_threshold_rate: f64,
    /// How many iterations of a large in-memory loop elapse between
    /// cooperative cancellation checks.
    pub cancel_check_interval: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(10_000),
            request_timeout: Duration::from_millis(30_000),
            validation_timeout: Duration::from_millis(15_000),
            max_retries: 3,
            failure_threshold: 5.0,
            reset_duration: Duration::from_millis(60_000),
            cache_max: 100,
            cache_ttl: Duration::from_secs(600),
            max_pages: 1000,
            inter_page_delay: Duration::from_millis(250),
            max_execution_time: Duration::from_secs(5 * 60),
            active_import_heartbeat: Duration::from_millis(30_000),
            active_import_stale: Duration::from_millis(5 * 60 * 1000),
            lock_wait: Duration::from_millis(30_000),
            workout_batch_size: 10,
            min_success_count: 1,
            failure_threshold_rate: 0.25,
            cancel_check_interval: 200,
        }
    }
}

impl SyncConfig {
    /// Starts from the documented defaults; use the setters below to override.
    pub fn builder() -> SyncConfigBuilder {
        SyncConfigBuilder(Self::default())
    }
}

/// Builder for [`SyncConfig`], so tests only need to override what matters.
#[derive(Debug, Clone)]
pub struct SyncConfigBuilder(SyncConfig);

macro_rules! setter {
    ($name:ident, $ty:ty) => {
        pub fn $name(mut self, value: $ty) -> Self {
            self.0.$name = value;
            self
        }
    };
}

impl SyncConfigBuilder {
    setter!(base_delay, Duration);
    setter!(max_delay, Duration);
    setter!(request_timeout, Duration);
    setter!(validation_timeout, Duration);
    setter!(max_retries, usize);
    setter!(failure_threshold, f64);
    setter!(reset_duration, Duration);
    setter!(cache_max, usize);
    setter!(cache_ttl, Duration);
    setter!(max_pages, u32);
    setter!(inter_page_delay, Duration);
    setter!(max_execution_time, Duration);
    setter!(active_import_heartbeat, Duration);
    setter!(active_import_stale, Duration);
    setter!(lock_wait, Duration);
    setter!(workout_batch_size, usize);
    setter!(min_success_count, usize);
    setter!(failure_threshold_rate, f64);
    setter!(cancel_check_interval, usize);

    pub fn build(self) -> SyncConfig {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let cfg = SyncConfig::default();
        assert_eq!(cfg.max_retries, 3);
        assert_eq!(cfg.failure_threshold, 5.0);
        assert_eq!(cfg.cache_max, 100);
        assert_eq!(cfg.workout_batch_size, 10);
        assert_eq!(cfg.failure_threshold_rate, 0.25);
    }

    #[test]
    fn builder_overrides_individual_fields() {
        let cfg = SyncConfig::builder()
            .max_retries(7)
            .cache_max(3)
            .build();
        assert_eq!(cfg.max_retries, 7);
        assert_eq!(cfg.cache_max, 3);
        assert_eq!(cfg.base_delay, Duration::from_millis(1000));
    }
}

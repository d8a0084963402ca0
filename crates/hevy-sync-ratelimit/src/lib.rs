//! Rate-limit header tracker.
//!
//! Every response is inspected for the case-insensitive
//! `X-RateLimit-{Remaining,Reset,Limit}` headers. If at least one is
//! present, the snapshot is persisted to the durable tier under
//! [`config::RATE_LIMIT_INFO_KEY`] with the same TTL as the response cache.
//! A low remaining budget emits a warning but never fails the call — this
//! tracker is purely observational.

mod config;
mod events;

pub use config::{RateLimitConfig, LOW_BUDGET_RATIO, RATE_LIMIT_INFO_KEY};
pub use events::RateLimitEvent;

use hevy_sync_core::{Clock, DurableStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

#[cfg(feature = "metrics")]
use metrics::counter;

/// Point-in-time view of the upstream API's rate-limit budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateLimitSnapshot {
    pub remaining: Option<u64>,
    pub limit: Option<u64>,
    pub reset_epoch: Option<u64>,
    pub observed_at: chrono::DateTime<chrono::Utc>,
}

pub struct RateLimitTracker<D: DurableStore, C: Clock> {
    config: RateLimitConfig,
    durable: Arc<D>,
    clock: Arc<C>,
}

impl<D: DurableStore, C: Clock> RateLimitTracker<D, C> {
    pub fn new(config: RateLimitConfig, durable: Arc<D>, clock: Arc<C>) -> Self {
        Self { config, durable, clock }
    }

    /// Extracts the rate-limit headers from a response (case-insensitive
    /// names) and, if any are present, persists an updated snapshot and
    /// warns when the remaining budget has dropped below 10%.
    pub async fn observe<'a, I>(&self, headers: I)
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut remaining = None;
        let mut limit = None;
        let mut reset = None;

        for (name, value) in headers {
            match name.to_ascii_lowercase().as_str() {
                "x-ratelimit-remaining" => remaining = value.parse::<u64>().ok(),
                "x-ratelimit-limit" => limit = value.parse::<u64>().ok(),
                "x-ratelimit-reset" => reset = value.parse::<u64>().ok(),
                _ => {}
            }
        }

        if remaining.is_none() && limit.is_none() && reset.is_none() {
            return;
        }

        let snapshot = RateLimitSnapshot {
            remaining,
            limit,
            reset_epoch: reset,
            observed_at: self.clock.now_utc(),
        };

        if let Ok(bytes) = serde_json::to_vec(&snapshot) {
            self.durable
                .put(RATE_LIMIT_INFO_KEY, bytes, self.config.snapshot_ttl)
                .await;
        }

        self.config.event_listeners.emit(&RateLimitEvent::SnapshotUpdated {
            pattern_name: self.config.name.clone(),
            timestamp: Instant::now(),
            remaining,
            limit,
        });

        if let (Some(remaining), Some(limit)) = (remaining, limit) {
            if limit > 0 && (remaining as f64 / limit as f64) < LOW_BUDGET_RATIO {
                #[cfg(feature = "tracing")]
                tracing::warn!(remaining, limit, "rate-limit budget running low");

                self.config.event_listeners.emit(&RateLimitEvent::LowBudgetWarning {
                    pattern_name: self.config.name.clone(),
                    timestamp: Instant::now(),
                    remaining,
                    limit,
                });

                #[cfg(feature = "metrics")]
                counter!("ratelimit_low_budget_warnings_total", "tracker" => self.config.name.clone())
                    .increment(1);
            }
        }
    }

    /// Returns the latest persisted snapshot, if any (durable-tier TTL
    /// means an old one simply disappears rather than being returned stale).
    pub async fn get_rate_limit_info(&self) -> Option<RateLimitSnapshot> {
        let bytes = self.durable.get(RATE_LIMIT_INFO_KEY).await?;
        serde_json::from_slice(&bytes).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hevy_sync_core::durable::in_memory::InMemoryDurableStore;
    use hevy_sync_core::TestClock;
    use std::time::Duration;

    fn tracker() -> RateLimitTracker<InMemoryDurableStore<TestClock>, TestClock> {
        let clock = Arc::new(TestClock::default());
        let durable = Arc::new(InMemoryDurableStore::new(Arc::clone(&clock)));
        RateLimitTracker::new(RateLimitConfig::new("test", Duration::from_secs(600)), durable, clock)
    }

    #[tokio::test]
    async fn no_headers_leaves_no_snapshot() {
        let t = tracker();
        t.observe(vec![("content-type", "application/json")]).await;
        assert_eq!(t.get_rate_limit_info().await, None);
    }

    #[tokio::test]
    async fn headers_are_case_insensitive_and_persisted() {
        let t = tracker();
        t.observe(vec![
            ("X-RateLimit-Remaining", "42"),
            ("x-ratelimit-limit", "100"),
            ("X-RATELIMIT-RESET", "1700000000"),
        ])
        .await;

        let snapshot = t.get_rate_limit_info().await.unwrap();
        assert_eq!(snapshot.remaining, Some(42));
        assert_eq!(snapshot.limit, Some(100));
        assert_eq!(snapshot.reset_epoch, Some(1_700_000_000));
    }

    #[tokio::test]
    async fn low_budget_emits_warning_event() {
        let t = tracker();
        let fired = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let fired2 = Arc::clone(&fired);

        let mut t = t;
        t.config = RateLimitConfig::new("test", Duration::from_secs(600))
            .with_listener(hevy_sync_core::FnListener::new(move |event: &RateLimitEvent| {
                if matches!(event, RateLimitEvent::LowBudgetWarning { .. }) {
                    fired2.store(true, std::sync::atomic::Ordering::SeqCst);
                }
            }));

        t.observe(vec![("x-ratelimit-remaining", "5"), ("x-ratelimit-limit", "100")]).await;
        assert!(fired.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[tokio::test]
    async fn exactly_ten_percent_does_not_warn() {
        let t = tracker();
        let fired = Arc::new(std::sync::atomic::AtomicBool::new(false));
        let fired2 = Arc::clone(&fired);

        let mut t = t;
        t.config = RateLimitConfig::new("test", Duration::from_secs(600))
            .with_listener(hevy_sync_core::FnListener::new(move |event: &RateLimitEvent| {
                if matches!(event, RateLimitEvent::LowBudgetWarning { .. }) {
                    fired2.store(true, std::sync::atomic::Ordering::SeqCst);
                }
            }));

        t.observe(vec![("x-ratelimit-remaining", "10"), ("x-ratelimit-limit", "100")]).await;
        assert!(!fired.load(std::sync::atomic::Ordering::SeqCst));
    }
}

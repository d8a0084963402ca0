//! Events emitted by the rate-limit tracker.

use hevy_sync_core::ResilienceEvent;
use std::time::Instant;

#[derive(Debug, Clone)]
pub enum RateLimitEvent {
    /// A response carried at least one rate-limit header; the snapshot was persisted.
    SnapshotUpdated {
        pattern_name: String,
        timestamp: Instant,
        remaining: Option<u64>,
        limit: Option<u64>,
    },
    /// remaining/limit dropped below the low-budget threshold.
    LowBudgetWarning {
        pattern_name: String,
        timestamp: Instant,
        remaining: u64,
        limit: u64,
    },
}

impl ResilienceEvent for RateLimitEvent {
    fn event_type(&self) -> &'static str {
        match self {
            RateLimitEvent::SnapshotUpdated { .. } => "snapshot_updated",
            RateLimitEvent::LowBudgetWarning { .. } => "low_budget_warning",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            RateLimitEvent::SnapshotUpdated { timestamp, .. }
            | RateLimitEvent::LowBudgetWarning { timestamp, .. } => *timestamp,
        }
    }

    fn pattern_name(&self) -> &str {
        match self {
            RateLimitEvent::SnapshotUpdated { pattern_name, .. }
            | RateLimitEvent::LowBudgetWarning { pattern_name, .. } => pattern_name,
        }
    }
}

//! Events emitted by the two-tier response cache.

use hevy_sync_core::ResilienceEvent;
use std::time::Instant;

#[derive(Debug, Clone)]
pub enum CacheEvent {
    Hit { pattern_name: String, timestamp: Instant, key: String },
    Miss { pattern_name: String, timestamp: Instant, key: String },
    Eviction { pattern_name: String, timestamp: Instant, key: String },
    DurableRepopulated { pattern_name: String, timestamp: Instant, key: String },
    DurableWriteFailed { pattern_name: String, timestamp: Instant, key: String },
}

impl ResilienceEvent for CacheEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CacheEvent::Hit { .. } => "hit",
            CacheEvent::Miss { .. } => "miss",
            CacheEvent::Eviction { .. } => "eviction",
            CacheEvent::DurableRepopulated { .. } => "durable_repopulated",
            CacheEvent::DurableWriteFailed { .. } => "durable_write_failed",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            CacheEvent::Hit { timestamp, .. }
            | CacheEvent::Miss { timestamp, .. }
            | CacheEvent::Eviction { timestamp, .. }
            | CacheEvent::DurableRepopulated { timestamp, .. }
            | CacheEvent::DurableWriteFailed { timestamp, .. } => *timestamp,
        }
    }

    fn pattern_name(&self) -> &str {
        match self {
            CacheEvent::Hit { pattern_name, .. }
            | CacheEvent::Miss { pattern_name, .. }
            | CacheEvent::Eviction { pattern_name, .. }
            | CacheEvent::DurableRepopulated { pattern_name, .. }
            | CacheEvent::DurableWriteFailed { pattern_name, .. } => pattern_name,
        }
    }
}

//! Events emitted by the progress tracker.

use hevy_sync_core::ResilienceEvent;
use std::time::Instant;

#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// The progress record was written (a checkpoint).
    Checkpointed {
        pattern_name: String,
        timestamp: Instant,
        completed_steps: usize,
    },
    /// The progress record was cleared (successful completion).
    ProgressCleared {
        pattern_name: String,
        timestamp: Instant,
    },
    /// The active-import marker was written.
    MarkedActive {
        pattern_name: String,
        timestamp: Instant,
    },
    /// The active-import marker's heartbeat was refreshed.
    HeartbeatSent {
        pattern_name: String,
        timestamp: Instant,
    },
    /// The active-import marker was cleared.
    MarkedInactive {
        pattern_name: String,
        timestamp: Instant,
    },
    /// A marker was found but its heartbeat was older than the stale
    /// threshold; treated as absent.
    StaleMarkerIgnored {
        pattern_name: String,
        timestamp: Instant,
    },
}

impl ResilienceEvent for ProgressEvent {
    fn event_type(&self) -> &'static str {
        match self {
            ProgressEvent::Checkpointed { .. } => "checkpointed",
            ProgressEvent::ProgressCleared { .. } => "progress_cleared",
            ProgressEvent::MarkedActive { .. } => "marked_active",
            ProgressEvent::HeartbeatSent { .. } => "heartbeat_sent",
            ProgressEvent::MarkedInactive { .. } => "marked_inactive",
            ProgressEvent::StaleMarkerIgnored { .. } => "stale_marker_ignored",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            ProgressEvent::Checkpointed { timestamp, .. }
            | ProgressEvent::ProgressCleared { timestamp, .. }
            | ProgressEvent::MarkedActive { timestamp, .. }
            | ProgressEvent::HeartbeatSent { timestamp, .. }
            | ProgressEvent::MarkedInactive { timestamp, .. }
            | ProgressEvent::StaleMarkerIgnored { timestamp, .. } => *timestamp,
        }
    }

    fn pattern_name(&self) -> &str {
        match self {
            ProgressEvent::Checkpointed { pattern_name, .. }
            | ProgressEvent::ProgressCleared { pattern_name, .. }
            | ProgressEvent::MarkedActive { pattern_name, .. }
            | ProgressEvent::HeartbeatSent { pattern_name, .. }
            | ProgressEvent::MarkedInactive { pattern_name, .. }
            | ProgressEvent::StaleMarkerIgnored { pattern_name, .. } => pattern_name,
        }
    }
}

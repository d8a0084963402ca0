use hevy_sync_core::ResilienceEvent;
use std::time::Instant;

/// Observability events for the delta workout import, following
/// the same [`ResilienceEvent`] shape every other component emits through.
#[derive(Debug, Clone)]
pub enum DeltaEvent {
    EventsPartitioned {
        pattern_name: String,
        timestamp: Instant,
        deleted: usize,
        upserts: usize,
    },
    RowsDeleted {
        pattern_name: String,
        timestamp: Instant,
        count: usize,
    },
    UpsertsFetched {
        pattern_name: String,
        timestamp: Instant,
        successes: usize,
        failures: usize,
    },
    FailureGateWarning {
        pattern_name: String,
        timestamp: Instant,
        message: String,
    },
    FailureGateRejected {
        pattern_name: String,
        timestamp: Instant,
        message: String,
    },
    RowsApplied {
        pattern_name: String,
        timestamp: Instant,
        updated: usize,
        inserted: usize,
    },
    CursorPersisted {
        pattern_name: String,
        timestamp: Instant,
    },
}

impl ResilienceEvent for DeltaEvent {
    fn pattern_name(&self) -> &str {
        match self {
            DeltaEvent::EventsPartitioned { pattern_name, .. }
            | DeltaEvent::RowsDeleted { pattern_name, .. }
            | DeltaEvent::UpsertsFetched { pattern_name, .. }
            | DeltaEvent::FailureGateWarning { pattern_name, .. }
            | DeltaEvent::FailureGateRejected { pattern_name, .. }
            | DeltaEvent::RowsApplied { pattern_name, .. }
            | DeltaEvent::CursorPersisted { pattern_name, .. } => pattern_name,
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            DeltaEvent::EventsPartitioned { timestamp, .. }
            | DeltaEvent::RowsDeleted { timestamp, .. }
            | DeltaEvent::UpsertsFetched { timestamp, .. }
            | DeltaEvent::FailureGateWarning { timestamp, .. }
            | DeltaEvent::FailureGateRejected { timestamp, .. }
            | DeltaEvent::RowsApplied { timestamp, .. }
            | DeltaEvent::CursorPersisted { timestamp, .. } => *timestamp,
        }
    }

    fn event_type(&self) -> &'static str {
        match self {
            DeltaEvent::EventsPartitioned { .. } => "events_partitioned",
            DeltaEvent::RowsDeleted { .. } => "rows_deleted",
            DeltaEvent::UpsertsFetched { .. } => "upserts_fetched",
            DeltaEvent::FailureGateWarning { .. } => "failure_gate_warning",
            DeltaEvent::FailureGateRejected { .. } => "failure_gate_rejected",
            DeltaEvent::RowsApplied { .. } => "rows_applied",
            DeltaEvent::CursorPersisted { .. } => "cursor_persisted",
        }
    }
}

//! Events emitted by the circuit breaker.

use crate::CircuitState;
use hevy_sync_core::ResilienceEvent;
use std::time::Instant;

/// Events emitted by [`crate::CircuitBreaker`].
#[derive(Debug, Clone)]
pub enum BreakerEvent {
    /// The breaker transitioned between states.
    StateTransition {
        pattern_name: String,
        timestamp: Instant,
        from_state: CircuitState,
        to_state: CircuitState,
    },
    /// A call was rejected because the breaker is open.
    CallRejected {
        pattern_name: String,
        timestamp: Instant,
        endpoint: String,
    },
    /// A success was recorded against the breaker.
    SuccessRecorded {
        pattern_name: String,
        timestamp: Instant,
        state: CircuitState,
    },
    /// A failure was recorded against the breaker.
    FailureRecorded {
        pattern_name: String,
        timestamp: Instant,
        state: CircuitState,
        weight: f64,
    },
}

impl ResilienceEvent for BreakerEvent {
    fn event_type(&self) -> &'static str {
        match self {
            BreakerEvent::StateTransition { .. } => "state_transition",
            BreakerEvent::CallRejected { .. } => "call_rejected",
            BreakerEvent::SuccessRecorded { .. } => "success_recorded",
            BreakerEvent::FailureRecorded { .. } => "failure_recorded",
        }
    }

    fn timestamp(&self) -> Instant {
        match self {
            BreakerEvent::StateTransition { timestamp, .. }
            | BreakerEvent::CallRejected { timestamp, .. }
            | BreakerEvent::SuccessRecorded { timestamp, .. }
            | BreakerEvent::FailureRecorded { timestamp, .. } => *timestamp,
        }
    }

    fn pattern_name(&self) -> &str {
        match self {
            BreakerEvent::StateTransition { pattern_name, .. }
            | BreakerEvent::CallRejected { pattern_name, .. }
            | BreakerEvent::SuccessRecorded { pattern_name, .. }
            | BreakerEvent::FailureRecorded { pattern_name, .. } => pattern_name,
        }
    }
}

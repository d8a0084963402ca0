//! Weighted-failure circuit breaker.
//!
//! Rather than a count/time sliding window, this breaker trips on a running
//! *weighted* failure sum: a `CircuitOpen` never contributes weight, a
//! retryable HTTP status contributes half weight, anything else contributes
//! full weight. There is exactly one breaker per [`hevy_sync_core`] host
//! context — it guards the single downstream API, not a generic `Service`.

mod config;
mod error;
mod events;

pub use config::BreakerConfig;
pub use error::CircuitOpenError;
pub use events::BreakerEvent;

use hevy_sync_core::Clock;
use std::sync::{Arc, Mutex};
use std::time::Instant;

#[cfg(feature = "metrics")]
use metrics::counter;

/// Current state of the breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

/// The weight class of a failure, per the breaker's tie-break order.
///
/// `CircuitOpen` and `Retryable` are named for the condition that produces
/// them rather than for the weight itself, so callers read naturally:
/// `FailureKind::retryable_status(503)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FailureKind {
    /// The call never reached the transport because the breaker was already
    /// open. Never contributes weight — the breaker must not trip itself.
    SelfRejected,
    /// A transient upstream condition (HTTP 429/502/503/504).
    Transient,
    /// Any other failure.
    Other,
}

impl FailureKind {
    pub fn weight(self) -> f64 {
        match self {
            FailureKind::SelfRejected => 0.0,
            FailureKind::Transient => 0.5,
            FailureKind::Other => 1.0,
        }
    }

    /// Classifies an HTTP status into a weight class.
    pub fn from_status(status: u16) -> Self {
        match status {
            429 | 502 | 503 | 504 => FailureKind::Transient,
            _ => FailureKind::Other,
        }
    }
}

struct Inner {
    state: CircuitState,
    weight: f64,
    last_failure: Option<Instant>,
}

/// Weighted-failure circuit breaker. Cloning shares the underlying state.
pub struct CircuitBreaker<C: Clock> {
    config: Arc<BreakerConfig>,
    clock: Arc<C>,
    inner: Mutex<Inner>,
}

impl<C: Clock> CircuitBreaker<C> {
    pub fn new(config: BreakerConfig, clock: Arc<C>) -> Self {
        Self {
            config: Arc::new(config),
            clock,
            inner: Mutex::new(Inner {
                state: CircuitState::Closed,
                weight: 0.0,
                last_failure: None,
            }),
        }
    }

    pub fn state(&self) -> CircuitState {
        self.inner.lock().unwrap().state
    }

    /// Checks whether a call to `endpoint` may proceed.
    ///
    /// If the breaker is OPEN and `RESET_MS` has elapsed since the last
    /// failure, transitions to HALF_OPEN (weight reset to zero) and allows
    /// the call through as a probe. Otherwise, an OPEN breaker fails fast.
    pub fn check(&self, endpoint: &str) -> Result<(), CircuitOpenError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.state != CircuitState::Open {
            return Ok(());
        }

        let last_failure = inner.last_failure.expect("OPEN implies last_failure is set");
        let elapsed = self.clock.now_instant().saturating_duration_since(last_failure);
        if elapsed > self.config.reset_duration {
            inner.state = CircuitState::HalfOpen;
            inner.weight = 0.0;
            self.emit_transition(CircuitState::Open, CircuitState::HalfOpen);
            return Ok(());
        }

        let remaining = self.config.reset_duration.saturating_sub(elapsed);
        let remaining_secs = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);

        self.config.event_listeners.emit(&BreakerEvent::CallRejected {
            pattern_name: self.config.name.clone(),
            timestamp: Instant::now(),
            endpoint: endpoint.to_string(),
        });
        #[cfg(feature = "metrics")]
        counter!("breaker_calls_rejected_total", "breaker" => self.config.name.clone()).increment(1);

        Err(CircuitOpenError {
            endpoint: endpoint.to_string(),
            remaining_secs,
        })
    }

    /// Records a successful call. HALF_OPEN→CLOSED is atomic with the
    /// weight reset; a CLOSED breaker simply zeroes its weight.
    pub fn record_success(&self) {
        let mut inner = self.inner.lock().unwrap();
        let from = inner.state;
        inner.weight = 0.0;
        if inner.state == CircuitState::HalfOpen {
            inner.state = CircuitState::Closed;
        }
        let to = inner.state;

        self.config.event_listeners.emit(&BreakerEvent::SuccessRecorded {
            pattern_name: self.config.name.clone(),
            timestamp: Instant::now(),
            state: to,
        });
        #[cfg(feature = "metrics")]
        counter!("breaker_calls_total", "breaker" => self.config.name.clone(), "outcome" => "success").increment(1);

        if from != to {
            drop(inner);
            self.emit_transition(from, to);
        }
    }

    /// Records a failure of the given weight class. A `HALF_OPEN` breaker
    /// reopens on any failure; a `CLOSED` breaker accumulates weight and
    /// trips once the threshold is met.
    pub fn record_failure(&self, kind: FailureKind) {
        let weight = kind.weight();
        let mut inner = self.inner.lock().unwrap();
        let from = inner.state;
        inner.weight += weight;
        inner.last_failure = Some(self.clock.now_instant());

        let to = match inner.state {
            CircuitState::HalfOpen => CircuitState::Open,
            _ if inner.weight >= self.config.failure_threshold => CircuitState::Open,
            other => other,
        };
        inner.state = to;

        self.config.event_listeners.emit(&BreakerEvent::FailureRecorded {
            pattern_name: self.config.name.clone(),
            timestamp: Instant::now(),
            state: to,
            weight,
        });
        #[cfg(feature = "metrics")]
        counter!("breaker_calls_total", "breaker" => self.config.name.clone(), "outcome" => "failure").increment(1);

        if from != to {
            drop(inner);
            self.emit_transition(from, to);
        }
    }

    fn emit_transition(&self, from: CircuitState, to: CircuitState) {
        #[cfg(feature = "tracing")]
        tracing::info!(breaker = %self.config.name, ?from, ?to, "circuit breaker state transition");

        self.config.event_listeners.emit(&BreakerEvent::StateTransition {
            pattern_name: self.config.name.clone(),
            timestamp: Instant::now(),
            from_state: from,
            to_state: to,
        });

        #[cfg(feature = "metrics")]
        {
            let label = |s: CircuitState| match s {
                CircuitState::Closed => "closed",
                CircuitState::Open => "open",
                CircuitState::HalfOpen => "half_open",
            };
            counter!(
                "breaker_transitions_total",
                "breaker" => self.config.name.clone(),
                "from" => label(from),
                "to" => label(to)
            )
            .increment(1);
        }
    }
}

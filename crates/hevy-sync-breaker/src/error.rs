use thiserror::Error;

/// Raised by [`crate::CircuitBreaker::check`] when the breaker is open.
///
/// Never retried: the Resilient Client treats this as final and the
/// orchestrator surfaces it directly, including the endpoint for context and
/// the remaining wait time rounded up to whole seconds.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("circuit open for '{endpoint}', retry in {remaining_secs}s")]
pub struct CircuitOpenError {
    pub endpoint: String,
    pub remaining_secs: u64,
}

//! Exponential backoff with full half-range jitter:
//!
//! `delay(attempt) = min(BASE_DELAY_MS * 2^attempt, MAX_DELAY_MS) * (0.5 + U[0,1) * 0.5)`

use std::time::Duration;

/// Computes the capped exponential delay, before jitter is applied.
fn capped_exponential(attempt: u32, base: Duration, max: Duration) -> Duration {
    let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
    let scaled = base.as_millis().saturating_mul(factor as u128);
    let capped = scaled.min(max.as_millis());
    Duration::from_millis(capped as u64)
}

/// Applies jitter in `[0.5, 1.0]` of the capped delay. `jitter_unit` must be
/// in `[0, 1)`; callers draw it from an RNG in production and from fixed
/// values in tests.
pub fn compute_delay(attempt: u32, base: Duration, max: Duration, jitter_unit: f64) -> Duration {
    let capped = capped_exponential(attempt, base, max);
    let factor = 0.5 + jitter_unit.clamp(0.0, 1.0) * 0.5;
    Duration::from_secs_f64(capped.as_secs_f64() * factor)
}

mod support;

mod breaker_trips_on_persistent_failures;
mod cache_hit_short_circuits_breaker;
mod cancellation_pause_and_resume;
mod delta_reconciliation;
mod failure_rate_gate;
mod happy_page_walk;

//! Scenario 2: five consecutive HTTP 500s trip the breaker; the next call
//! fails fast with `CircuitOpen` and never reaches the transport. Run
//! against the client `SyncContext` assembles, not a bare `CircuitBreaker`,
//! so the weighted-failure wiring through `ResilientClient::request` is
//! what's actually under test.

use std::sync::Arc;

use hevy_sync::prelude::*;
use hevy_sync_transport::fake::ScriptedTransport;

use super::support::{context, NoopDialog};

#[tokio::test]
async fn fifth_failure_trips_the_breaker_and_the_sixth_fails_fast() {
    let transport = Arc::new(ScriptedTransport::new());
    for _ in 0..5 {
        transport.push_status(500);
    }
    let clock = Arc::new(TestClock::default());
    let config = SyncConfig::builder().max_retries(1).build();
    let (ctx, _properties, _sheets) = context(transport.clone(), clock, NoopDialog::resuming(), config);
    let client = ctx.client();

    for _ in 0..5 {
        let err = client.request("/exercise_templates", HttpMethod::Get, &[], None).await.unwrap_err();
        assert_eq!(err.status(), Some(500));
    }
    assert_eq!(client.breaker().state(), CircuitState::Open);

    let before = transport.request_count();
    let err = client.request("/exercise_templates", HttpMethod::Get, &[], None).await.unwrap_err();
    assert!(err.is_circuit_open());
    assert_eq!(transport.request_count(), before, "a tripped breaker must not reach the transport");
}

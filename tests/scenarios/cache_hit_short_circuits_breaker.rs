//! Scenario 3: a GET cached before the breaker trips keeps serving the
//! cached payload afterward without contacting the transport — the cache
//! lookup in `ResilientClient::request` happens before the breaker check
//! result would otherwise matter for a GET.

use std::sync::Arc;

use hevy_sync::prelude::*;
use hevy_sync_transport::fake::ScriptedTransport;
use serde_json::json;

use super::support::{context, NoopDialog};

#[tokio::test]
async fn cached_get_survives_a_later_breaker_trip() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_json(200, json!({"id": 1}));
    for _ in 0..5 {
        transport.push_status(500);
    }

    let clock = Arc::new(TestClock::default());
    let config = SyncConfig::builder().max_retries(1).build();
    let (ctx, _properties, _sheets) = context(transport.clone(), clock, NoopDialog::resuming(), config);
    let client = ctx.client();

    let query = vec![("p".to_string(), "1".to_string())];
    let first = client.request("/x", HttpMethod::Get, &query, None).await.unwrap();
    assert_eq!(first, Payload::Json(json!({"id": 1})));

    for _ in 0..5 {
        let _ = client.request("/y", HttpMethod::Get, &[], None).await;
    }
    assert_eq!(client.breaker().state(), CircuitState::Open);

    let before = transport.request_count();
    let second = client.request("/x", HttpMethod::Get, &query, None).await.unwrap();
    assert_eq!(second, Payload::Json(json!({"id": 1})));
    assert_eq!(transport.request_count(), before, "a cache hit must not touch the transport");
}

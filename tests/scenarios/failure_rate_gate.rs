//! Scenario 6: 100 upsert ids, 30 per-id fetches fail (30%, past the 25%
//! threshold). The delta import aborts with a message-bearing error listing
//! up to ten of the failed ids, and the cursor is not advanced.

use std::sync::Arc;
use std::time::Duration;

use hevy_sync::prelude::*;
use hevy_sync_delta::{DeltaConfig, LAST_WORKOUT_UPDATE_KEY};
use hevy_sync_transport::fake::ScriptedTransport;
use serde_json::json;

use super::support::{context, NoopDialog};

#[tokio::test]
async fn thirty_percent_fetch_failures_rejects_the_whole_delta() {
    let transport = Arc::new(ScriptedTransport::new());

    let events: Vec<_> = (0..100)
        .map(|i| json!({"type": "created", "workout_id": format!("wk{i}")}))
        .collect();
    transport.push_json(200, json!({"events": events}));

    // The first 30 ids fail; the rest succeed.
    for i in 0..100 {
        if i < 30 {
            transport.push_status(500);
        } else {
            transport.push_json(200, json!({"id": format!("wk{i}"), "title": "Workout", "exercises": []}));
        }
    }

    let clock = Arc::new(TestClock::default());
    let config = SyncConfig::builder().build();
    let (ctx, properties, sheets) = context(transport, Arc::clone(&clock), NoopDialog::resuming(), config);
    properties.set(LAST_WORKOUT_UPDATE_KEY, "2026-01-01T00:00:00Z").await;

    let step = WorkoutsStep::new(
        Arc::clone(ctx.client()),
        Arc::clone(&sheets),
        Arc::clone(&properties),
        clock,
        DeltaConfig::new("hevy-sync", 100, Duration::from_millis(0), 1, 0.25, 50, 1000),
    );

    let err = step.run(&|| false).await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("30 of 100 workout fetches failed"), "{message}");
    assert!(message.contains("and 20 more"), "{message}");

    let cursor = properties.get(LAST_WORKOUT_UPDATE_KEY).await.unwrap();
    assert_eq!(cursor, "2026-01-01T00:00:00Z", "a rejected gate must not advance the cursor");

    assert!(sheets.dump("Workouts").await.is_empty(), "a rejected gate must not write any rows");
}

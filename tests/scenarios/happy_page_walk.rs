//! Scenario 1 from the specification: a two-page walk where the second
//! page is short, driven through the real `exercises` step (client,
//! breaker, cache, and pagination engine all wired together via
//! `SyncContext`) rather than calling `fetch_paginated` directly.

use std::sync::Arc;
use std::time::Duration;

use hevy_sync::prelude::*;
use hevy_sync_transport::fake::ScriptedTransport;
use serde_json::json;

use super::support::{context, NoopDialog};

#[tokio::test]
async fn exercises_step_stops_after_the_short_second_page() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_json(
        200,
        json!({"exercise_templates": [
            {"id": "1", "title": "Bench Press", "type": "weight_reps"},
            {"id": "2", "title": "Squat", "type": "weight_reps"},
            {"id": "3", "title": "Deadlift", "type": "weight_reps"}
        ], "page_count": 2}),
    );
    transport.push_json(
        200,
        json!({"exercise_templates": [
            {"id": "4", "title": "Overhead Press", "type": "weight_reps"},
            {"id": "5", "title": "Row", "type": "weight_reps"}
        ], "page_count": 2}),
    );

    let clock = Arc::new(TestClock::default());
    let config = SyncConfig::builder().inter_page_delay(Duration::from_millis(0)).build();
    let pagination = PaginationConfig::from_sync_config(&config);
    let (ctx, _properties, sheets) = context(transport.clone(), clock, NoopDialog::resuming(), config);

    let step = ExercisesStep::new(Arc::clone(ctx.client()), sheets.clone(), pagination);
    step.run(&|| false).await.unwrap();

    // Exactly two requests: no third page fetched once the second comes
    // back shorter than the page size.
    assert_eq!(transport.request_count(), 2);

    let dump = sheets.dump("Exercises").await;
    let ids: Vec<_> = dump[1..].iter().map(|row| row[0].as_text().unwrap().to_string()).collect();
    assert_eq!(ids, vec!["1", "2", "3", "4", "5"]);
}

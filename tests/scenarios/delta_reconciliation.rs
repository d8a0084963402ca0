//! Scenario 4: existing rows `{A, B, C}`; events `[del A, upd B, new D]`;
//! per-id fetches succeed for both B and D. Final table rows: `{B′, C, D}`;
//! the cursor advances to the current instant.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use hevy_sync::prelude::*;
use hevy_sync_delta::{DeltaConfig, LAST_WORKOUT_UPDATE_KEY};
use hevy_sync_transport::fake::ScriptedTransport;
use serde_json::json;

use super::support::{context, NoopDialog};

fn workout_row(id: &str, title: &str) -> Vec<CellValue> {
    vec![
        CellValue::Text(id.into()),
        CellValue::Text(title.into()),
        CellValue::Empty,
        CellValue::Empty,
        CellValue::Empty,
        CellValue::Empty,
        CellValue::Empty,
        CellValue::Empty,
    ]
}

#[tokio::test]
async fn delete_update_and_insert_events_reconcile_into_the_expected_rows() {
    let transport = Arc::new(ScriptedTransport::new());
    transport.push_json(
        200,
        json!({"events": [
            {"type": "deleted", "workout_id": "A"},
            {"type": "updated", "workout_id": "B"},
            {"type": "created", "workout_id": "D"},
        ]}),
    );
    transport.push_json(200, json!({"id": "B", "title": "Updated Push Day", "exercises": []}));
    transport.push_json(200, json!({"id": "D", "title": "Leg Day", "exercises": []}));

    let clock = Arc::new(TestClock::default());
    let config = SyncConfig::builder().build();
    let (ctx, properties, sheets) = context(transport, Arc::clone(&clock), NoopDialog::resuming(), config);

    sheets
        .seed(
            "Workouts",
            vec![
                Vec::new(),
                workout_row("A", "Original A"),
                workout_row("B", "Original B"),
                workout_row("C", "Leg Day"),
            ],
        )
        .await;
    properties.set(LAST_WORKOUT_UPDATE_KEY, "2026-01-01T00:00:00Z").await;

    let step = WorkoutsStep::new(
        Arc::clone(ctx.client()),
        Arc::clone(&sheets),
        Arc::clone(&properties),
        clock,
        DeltaConfig::new("hevy-sync", 10, Duration::from_millis(0), 1, 0.25, 50, 1000),
    );

    step.run(&|| false).await.unwrap();

    let dump = sheets.dump("Workouts").await;
    let ids: HashSet<String> =
        dump[1..].iter().filter_map(|row| row.first().and_then(CellValue::as_text)).map(str::to_string).collect();
    assert_eq!(ids, ["B", "C", "D"].into_iter().map(String::from).collect());

    let b_row = dump[1..].iter().find(|row| row.first().and_then(CellValue::as_text) == Some("B")).unwrap();
    assert_eq!(b_row[1], CellValue::Text("Updated Push Day".into()));

    let new_cursor = properties.get(LAST_WORKOUT_UPDATE_KEY).await.unwrap();
    assert_ne!(new_cursor, "2026-01-01T00:00:00Z");
}

//! Scenario 5: `exercises` finishes; `routines` starts its first page fetch,
//! which returns a full page (forcing a second-page check); by the time
//! that check runs the deadline has passed, so `routines` aborts with
//! `CancelledByTimeout`. Only `exercises` — the step that actually
//! completed — is recorded in the progress checkpoint, and the active
//! marker is cleared. A second run with `RESUME` skips `exercises` and
//! finishes `routines` against a fresh deadline.
//!
//! Each run gets its own transport and cache/durable-store instance (as a
//! real process restart between runs would), while the progress/tabular
//! stores and the clock carry over — exactly what a resume needs to
//! survive and nothing more.

use std::sync::Arc;
use std::time::Duration;

use hevy_sync::prelude::*;
use hevy_sync_core::durable::in_memory::InMemoryDurableStore;
use hevy_sync_core::interfaces::in_memory::{InMemoryPropertyStore, InMemoryTabularStore};
use hevy_sync_transport::fake::ScriptedTransport;
use serde_json::json;

use super::support::{ClockAdvancingTransport, NoopDialog, NoopTimer};

fn routines_page(ids: &[&str]) -> serde_json::Value {
    let items: Vec<_> = ids
        .iter()
        .map(|id| json!({"id": id, "title": "Routine", "folder_id": null, "updated_at": "2026-01-01"}))
        .collect();
    json!({"routines": items})
}

#[tokio::test]
async fn cancellation_mid_run_pauses_and_resume_finishes_the_remaining_step() {
    let clock = Arc::new(TestClock::default());
    let sheets = Arc::new(InMemoryTabularStore::new());
    let properties = Arc::new(InMemoryPropertyStore::new());

    let config = SyncConfig::builder()
        .max_execution_time(Duration::from_millis(15))
        .inter_page_delay(Duration::from_millis(0))
        .build();
    let pagination = PaginationConfig::from_sync_config(&config);

    // Run 1: exercises completes; routines' first page is a full 100-item
    // page, so the walk checks for a second page — which is where the
    // deadline is caught.
    let inner1 = Arc::new(ScriptedTransport::new());
    inner1.push_json(200, json!({"exercise_templates": [{"id": "e1", "title": "Bench"}]}));
    let ids: Vec<String> = (0..100).map(|i| format!("r{i}")).collect();
    let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
    inner1.push_json(200, routines_page(&id_refs));
    let transport1 = Arc::new(ClockAdvancingTransport::new(Arc::clone(&inner1), Arc::clone(&clock), Duration::from_millis(10)));
    let durable1 = Arc::new(InMemoryDurableStore::new(Arc::clone(&clock)));

    let ctx1 = SyncContext::new(
        transport1,
        "https://api.example.com",
        "test-key",
        durable1,
        Arc::clone(&sheets),
        Arc::clone(&properties),
        Arc::new(NoopDialog::resuming()),
        Arc::new(NoopTimer),
        Arc::new(InMemoryImportLock::new()),
        Arc::clone(&clock),
        config.clone(),
    );
    let steps1: Vec<Arc<dyn ImportStep<SyncError>>> = vec![
        Arc::new(ExercisesStep::new(Arc::clone(ctx1.client()), Arc::clone(&sheets), pagination)),
        Arc::new(RoutinesStep::new(Arc::clone(ctx1.client()), Arc::clone(&sheets), pagination)),
    ];

    let outcome = ctx1
        .orchestrator()
        .run_full_import(&steps1, Some("550e8400-e29b-41d4-a716-446655440000".into()), false)
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::Paused);
    assert_eq!(inner1.request_count(), 2, "routines must have fetched exactly its first page before the deadline caught it");

    let raw_progress = properties.get("IMPORT_PROGRESS").await.expect("a pause checkpoints progress");
    let record: ImportProgressRecord = serde_json::from_str(&raw_progress).unwrap();
    assert_eq!(record.completed_steps, ["exercises".to_string()].into_iter().collect());

    assert!(properties.get("IMPORT_ACTIVE").await.is_none(), "the finalizer must clear the active marker on pause");

    // Run 2 (resume): exercises is skipped; routines gets a fresh short
    // page against a new deadline and completes.
    let inner2 = Arc::new(ScriptedTransport::new());
    inner2.push_json(200, routines_page(&["r0"]));
    let transport2 = Arc::new(ClockAdvancingTransport::new(Arc::clone(&inner2), Arc::clone(&clock), Duration::from_millis(10)));
    let durable2 = Arc::new(InMemoryDurableStore::new(Arc::clone(&clock)));

    let ctx2 = SyncContext::new(
        transport2,
        "https://api.example.com",
        "test-key",
        durable2,
        Arc::clone(&sheets),
        Arc::clone(&properties),
        Arc::new(NoopDialog::resuming()),
        Arc::new(NoopTimer),
        Arc::new(InMemoryImportLock::new()),
        Arc::clone(&clock),
        config,
    );
    let steps2: Vec<Arc<dyn ImportStep<SyncError>>> = vec![
        Arc::new(ExercisesStep::new(Arc::clone(ctx2.client()), Arc::clone(&sheets), pagination)),
        Arc::new(RoutinesStep::new(Arc::clone(ctx2.client()), Arc::clone(&sheets), pagination)),
    ];

    let outcome = ctx2
        .orchestrator()
        .run_full_import(&steps2, Some("550e8400-e29b-41d4-a716-446655440000".into()), false)
        .await
        .unwrap();

    assert_eq!(outcome, RunOutcome::Completed);
    assert_eq!(inner2.request_count(), 1, "exercises must not be re-fetched on resume");
    assert!(properties.get("IMPORT_PROGRESS").await.is_none(), "a completed run clears the progress record");

    let dump = sheets.dump("Routines").await;
    assert_eq!(dump.len(), 2);
    assert_eq!(dump[1][0], CellValue::Text("r0".into()));
}

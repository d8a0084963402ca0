//! Delta Workout Import: the event-driven reconciliation path
//! used for `workouts` once a cursor exists, plus the simpler full-import
//! bootstrap used on first run.

mod config;
mod error;
mod events;
mod projector;

pub use config::{DeltaConfig, LAST_WORKOUT_UPDATE_KEY};
pub use error::DeltaError;
pub use events::DeltaEvent;
pub use projector::WorkoutProjector;

use chrono::Utc;
use futures::future::join_all;
use hevy_sync_client::{HttpMethod, ResilientClient};
use hevy_sync_core::{CellValue, Clock, DurableStore, PropertyStore, RangeRef, SheetError, TabularStore};
use hevy_sync_pagination::{fetch_paginated, PaginationConfig};
use hevy_sync_transport::Transport;
use std::collections::{HashMap, HashSet};
use std::time::Instant;

#[cfg(feature = "metrics")]
use metrics::counter;

const FIRST_DATA_ROW: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkoutEventKind {
    Created,
    Updated,
    Deleted,
}

/// One entry from the `workouts/events` endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutEvent {
    pub kind: WorkoutEventKind,
    pub workout_id: String,
}

impl WorkoutEvent {
    /// Parses one event payload. The workout id may come from a top-level
    /// `workout_id`/`id` field or an embedded `workout.id` object.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        let kind = match value.get("type").and_then(|v| v.as_str())? {
            "created" => WorkoutEventKind::Created,
            "updated" => WorkoutEventKind::Updated,
            "deleted" => WorkoutEventKind::Deleted,
            _ => return None,
        };

        let workout_id = value
            .get("workout_id")
            .and_then(|v| v.as_str())
            .or_else(|| value.get("id").and_then(|v| v.as_str()))
            .or_else(|| value.get("workout").and_then(|w| w.get("id")).and_then(|v| v.as_str()))
            .map(str::to_string)?;

        Some(Self { kind, workout_id })
    }
}

/// Partitions raw event payloads into deduplicated deleted-ids and
/// order-preserving, deduplicated (latest wins) upsert-ids.
pub fn partition_events(events: &[serde_json::Value]) -> (HashSet<String>, Vec<String>) {
    let mut deleted = HashSet::new();
    let mut upserts = Vec::new();
    let mut seen_upsert = HashSet::new();

    for raw in events {
        let Some(event) = WorkoutEvent::from_json(raw) else {
            continue;
        };

        match event.kind {
            WorkoutEventKind::Deleted => {
                deleted.insert(event.workout_id);
            }
            WorkoutEventKind::Created | WorkoutEventKind::Updated => {
                if seen_upsert.insert(event.workout_id.clone()) {
                    upserts.push(event.workout_id);
                }
            }
        }
    }

    (deleted, upserts)
}

/// Reads the current workout rows, drops any whose id is in `deleted_ids`,
/// clears the range, and rewrites the survivors in a single bulk write.
/// `cancel_check`, when present, is polled every `cancel_check_interval`
/// rows while filtering — the one in-memory loop here large enough to
/// warrant it.
pub async fn delete_phase<S, Pj>(
    sheet: &S,
    sheet_name: &str,
    projector: &Pj,
    deleted_ids: &HashSet<String>,
    cancel_check: Option<&(dyn Fn() -> bool + Send + Sync)>,
    cancel_check_interval: usize,
) -> Result<usize, DeltaError>
where
    S: TabularStore,
    Pj: WorkoutProjector,
{
    if deleted_ids.is_empty() {
        return Ok(0);
    }

    let last_row = sheet.last_row(sheet_name).await?;
    let last_col = sheet.last_column(sheet_name).await?;

    if (projector.id_column() as u32) >= last_col {
        return Err(DeltaError::Sheet(SheetError::MissingColumn {
            sheet: sheet_name.to_string(),
            column: "id".to_string(),
        }));
    }

    if last_row < FIRST_DATA_ROW {
        return Ok(0);
    }

    let range = RangeRef::new(FIRST_DATA_ROW, 1, last_row, last_col);
    let rows = sheet.read_range(sheet_name, range).await?;
    let before = rows.len();

    let interval = cancel_check_interval.max(1);
    let mut kept: Vec<Vec<CellValue>> = Vec::with_capacity(before);
    for (index, row) in rows.into_iter().enumerate() {
        if index > 0 && index % interval == 0 {
            if let Some(check) = cancel_check {
                if check() {
                    return Err(DeltaError::CancelledByTimeout);
                }
            }
        }
        let keep = match projector.row_id(&row) {
            Some(id) => !deleted_ids.contains(&id),
            None => true,
        };
        if keep {
            kept.push(row);
        }
    }

    let removed = before - kept.len();

    sheet.clear_range(sheet_name, range).await?;
    if !kept.is_empty() {
        let new_range = RangeRef::new(FIRST_DATA_ROW, 1, FIRST_DATA_ROW + kept.len() as u32 - 1, last_col);
        sheet.write_range(sheet_name, new_range, kept).await?;
    }

    Ok(removed)
}

/// The result of the upsert-fetch phase: successfully fetched workout JSON
/// bodies, plus the ids that failed.
#[derive(Debug, Default)]
pub struct UpsertOutcome {
    pub successes: Vec<serde_json::Value>,
    pub failed_ids: Vec<String>,
}

/// Fetches each upsert id via `GET /workouts/{id}` in bounded concurrent
/// batches of `workout_batch_size`, sleeping `inter_page_delay` between
/// batches. Checked against `cancel_check` once per
/// batch — a true result aborts with [`DeltaError::CancelledByTimeout`].
pub async fn fetch_upserts<T, D, C>(
    client: &ResilientClient<T, D, C>,
    ids: &[String],
    config: &DeltaConfig,
    cancel_check: Option<&(dyn Fn() -> bool + Send + Sync)>,
) -> Result<UpsertOutcome, DeltaError>
where
    T: Transport,
    D: DurableStore,
    C: Clock,
{
    let mut outcome = UpsertOutcome::default();
    let batches: Vec<&[String]> = ids.chunks(config.workout_batch_size.max(1)).collect();

    for (index, batch) in batches.iter().enumerate() {
        if let Some(check) = cancel_check {
            if check() {
                return Err(DeltaError::CancelledByTimeout);
            }
        }

        let futs = batch.iter().map(|id| async move {
            let path = format!("/workouts/{id}");
            let result = client.request(&path, HttpMethod::Get, &[], None).await;
            (id.clone(), result)
        });

        for (id, result) in join_all(futs).await {
            match result {
                Ok(payload) => match payload.as_json() {
                    Some(json) => outcome.successes.push(json.clone()),
                    None => outcome.failed_ids.push(id),
                },
                Err(_) => outcome.failed_ids.push(id),
            }
        }

        if index + 1 < batches.len() {
            tokio::time::sleep(config.inter_page_delay).await;
        }
    }

    Ok(outcome)
}

/// The failure-gate verdict.
pub enum GateOutcome {
    Proceed { warning: Option<String> },
    Reject(String),
}

/// Evaluates the failure gate over a completed upsert-fetch phase.
pub fn evaluate_failure_gate(total: usize, failed_ids: &[String], config: &DeltaConfig) -> GateOutcome {
    let failures = failed_ids.len();
    let successes = total.saturating_sub(failures);

    if successes < config.min_success_count {
        return GateOutcome::Reject(format!(
            "only {successes} of {total} workout fetches succeeded (minimum {})",
            config.min_success_count
        ));
    }

    if failures > 1 {
        let failure_rate = failures as f64 / total.max(1) as f64;
        if failure_rate > config.failure_threshold_rate {
            return GateOutcome::Reject(describe_failures(
                "delta import rejected",
                failed_ids,
                total,
                failure_rate,
            ));
        }
    }

    if failures == 0 {
        GateOutcome::Proceed { warning: None }
    } else {
        let failure_rate = failures as f64 / total.max(1) as f64;
        GateOutcome::Proceed {
            warning: Some(describe_failures("some workout fetches failed", failed_ids, total, failure_rate)),
        }
    }
}

fn describe_failures(prefix: &str, failed_ids: &[String], total: usize, failure_rate: f64) -> String {
    let shown: Vec<&str> = failed_ids.iter().take(10).map(String::as_str).collect();
    let mut message = format!(
        "{prefix}: {} of {} workout fetches failed ({:.0}%): {}",
        failed_ids.len(),
        total,
        failure_rate * 100.0,
        shown.join(", ")
    );
    if failed_ids.len() > 10 {
        message.push_str(&format!(" and {} more", failed_ids.len() - 10));
    }
    message
}

/// Projects successful workouts into rows and writes them. Matching-length updates are written in place via merged
/// contiguous-row segments; a workout whose set count changed, and any
/// brand-new workout, is appended as a single inserted block above the
/// first data row.
pub async fn apply_phase<S, Pj>(
    sheet: &S,
    sheet_name: &str,
    projector: &Pj,
    workouts: &[serde_json::Value],
    cancel_check: Option<&(dyn Fn() -> bool + Send + Sync)>,
    cancel_check_interval: usize,
) -> Result<(usize, usize), DeltaError>
where
    S: TabularStore,
    Pj: WorkoutProjector,
{
    if workouts.is_empty() {
        return Ok((0, 0));
    }

    let last_row = sheet.last_row(sheet_name).await?;
    let last_col = sheet.last_column(sheet_name).await?;

    let id_ranges = if last_row >= FIRST_DATA_ROW {
        let range = RangeRef::new(FIRST_DATA_ROW, 1, last_row, last_col);
        let rows = sheet.read_range(sheet_name, range).await?;
        contiguous_id_ranges(&rows, projector)
    } else {
        HashMap::new()
    };

    let mut row_writes: Vec<(u32, Vec<CellValue>)> = Vec::new();
    let mut new_block_rows: Vec<Vec<CellValue>> = Vec::new();
    let mut clear_ranges: Vec<(u32, u32)> = Vec::new();
    let mut updated = 0usize;
    let mut inserted = 0usize;
    let interval = cancel_check_interval.max(1);

    for (index, workout) in workouts.iter().enumerate() {
        if index > 0 && index % interval == 0 {
            if let Some(check) = cancel_check {
                if check() {
                    return Err(DeltaError::CancelledByTimeout);
                }
            }
        }

        let Some(id) = projector.workout_id(workout) else {
            continue;
        };
        let projected = projector.project(workout);

        match id_ranges.get(&id) {
            Some(&(start, end)) if (end - start + 1) as usize == projected.len() => {
                updated += 1;
                for (offset, row) in projected.into_iter().enumerate() {
                    row_writes.push((start + offset as u32, row));
                }
            }
            Some(&(start, end)) => {
                updated += 1;
                clear_ranges.push((start, end));
                new_block_rows.extend(projected);
            }
            None => {
                inserted += 1;
                new_block_rows.extend(projected);
            }
        }
    }

    row_writes.sort_by_key(|(row, _)| *row);
    for segment in merge_into_segments(row_writes) {
        let start = segment.first().map(|(row, _)| *row).expect("segment is never empty");
        let end = segment.last().map(|(row, _)| *row).expect("segment is never empty");
        let rows: Vec<Vec<CellValue>> = segment.into_iter().map(|(_, row)| row).collect();
        sheet.write_range(sheet_name, RangeRef::new(start, 1, end, last_col), rows).await?;
    }

    for (start, end) in clear_ranges {
        sheet.clear_range(sheet_name, RangeRef::new(start, 1, end, last_col)).await?;
    }

    if !new_block_rows.is_empty() {
        sheet.insert_rows_at(sheet_name, FIRST_DATA_ROW, new_block_rows).await?;
    }

    Ok((updated, inserted))
}

/// Groups existing rows into contiguous `(start_row, end_row)` ranges keyed
/// by workout id — rows for one workout are always written adjacently, so a
/// run of consecutive rows sharing an id is that workout's block.
fn contiguous_id_ranges<Pj: WorkoutProjector>(rows: &[Vec<CellValue>], projector: &Pj) -> HashMap<String, (u32, u32)> {
    let mut ranges = HashMap::new();
    let mut current: Option<(String, u32, u32)> = None;

    for (offset, row) in rows.iter().enumerate() {
        let absolute_row = FIRST_DATA_ROW + offset as u32;
        let id = projector.row_id(row);

        match (&mut current, id) {
            (Some((current_id, _, end)), Some(id)) if *current_id == id => {
                *end = absolute_row;
            }
            (_, Some(id)) => {
                if let Some((prev_id, start, end)) = current.take() {
                    ranges.insert(prev_id, (start, end));
                }
                current = Some((id, absolute_row, absolute_row));
            }
            (_, None) => {
                if let Some((prev_id, start, end)) = current.take() {
                    ranges.insert(prev_id, (start, end));
                }
            }
        }
    }

    if let Some((prev_id, start, end)) = current {
        ranges.insert(prev_id, (start, end));
    }

    ranges
}

fn merge_into_segments(rows: Vec<(u32, Vec<CellValue>)>) -> Vec<Vec<(u32, Vec<CellValue>)>> {
    let mut segments: Vec<Vec<(u32, Vec<CellValue>)>> = Vec::new();

    for entry in rows {
        match segments.last_mut() {
            Some(segment) if segment.last().is_some_and(|(row, _)| *row + 1 == entry.0) => {
                segment.push(entry);
            }
            _ => segments.push(vec![entry]),
        }
    }

    segments
}

async fn persist_cursor<P, C>(properties: &P, clock: &C) -> Result<(), DeltaError>
where
    P: PropertyStore,
    C: Clock,
{
    properties.set(LAST_WORKOUT_UPDATE_KEY, &clock.now_utc().to_rfc3339()).await;
    Ok(())
}

/// Runs the event-driven delta import.
#[allow(clippy::too_many_arguments)]
pub async fn run_delta_import<T, D, C, S, P, Pj>(
    client: &ResilientClient<T, D, C>,
    sheet: &S,
    properties: &P,
    projector: &Pj,
    sheet_name: &str,
    cursor: &str,
    config: &DeltaConfig,
    clock: &C,
    cancel_check: Option<&(dyn Fn() -> bool + Send + Sync)>,
) -> Result<(), DeltaError>
where
    T: Transport,
    D: DurableStore,
    C: Clock,
    S: TabularStore,
    P: PropertyStore,
    Pj: WorkoutProjector,
{
    let pagination_config = PaginationConfig {
        max_pages: config.max_pages,
        inter_page_delay: config.inter_page_delay,
    };

    let mut raw_events = Vec::new();
    let since_param = vec![("since".to_string(), cursor.to_string())];
    let sync_cancel: Option<&dyn Fn() -> bool> = cancel_check.map(|c| -> &dyn Fn() -> bool { c });

    fetch_paginated::<_, _, _, _, _, std::convert::Infallible>(
        client,
        "workouts/events",
        config.page_size,
        "events",
        &since_param,
        &pagination_config,
        sync_cancel,
        |items| {
            raw_events.extend(items);
            async { Ok(()) }
        },
    )
    .await?;

    let (deleted_ids, upsert_ids) = partition_events(&raw_events);
    config.event_listeners.emit(&DeltaEvent::EventsPartitioned {
        pattern_name: config.name.clone(),
        timestamp: Instant::now(),
        deleted: deleted_ids.len(),
        upserts: upsert_ids.len(),
    });

    let removed =
        delete_phase(sheet, sheet_name, projector, &deleted_ids, cancel_check, config.cancel_check_interval).await?;
    config.event_listeners.emit(&DeltaEvent::RowsDeleted {
        pattern_name: config.name.clone(),
        timestamp: Instant::now(),
        count: removed,
    });

    if upsert_ids.is_empty() {
        persist_cursor(properties, clock).await?;
        config.event_listeners.emit(&DeltaEvent::CursorPersisted {
            pattern_name: config.name.clone(),
            timestamp: Instant::now(),
        });
        return Ok(());
    }

    let outcome = fetch_upserts(client, &upsert_ids, config, cancel_check).await?;
    config.event_listeners.emit(&DeltaEvent::UpsertsFetched {
        pattern_name: config.name.clone(),
        timestamp: Instant::now(),
        successes: outcome.successes.len(),
        failures: outcome.failed_ids.len(),
    });
    #[cfg(feature = "metrics")]
    counter!("delta_upsert_failures_total", "pattern" => config.name.clone()).increment(outcome.failed_ids.len() as u64);

    match evaluate_failure_gate(upsert_ids.len(), &outcome.failed_ids, config) {
        GateOutcome::Reject(message) => {
            config.event_listeners.emit(&DeltaEvent::FailureGateRejected {
                pattern_name: config.name.clone(),
                timestamp: Instant::now(),
                message: message.clone(),
            });
            return Err(DeltaError::FailureGateRejected(message));
        }
        GateOutcome::Proceed { warning: Some(message) } => {
            config.event_listeners.emit(&DeltaEvent::FailureGateWarning {
                pattern_name: config.name.clone(),
                timestamp: Instant::now(),
                message,
            });
        }
        GateOutcome::Proceed { warning: None } => {}
    }

    let (updated, inserted) = apply_phase(
        sheet,
        sheet_name,
        projector,
        &outcome.successes,
        cancel_check,
        config.cancel_check_interval,
    )
    .await?;
    config.event_listeners.emit(&DeltaEvent::RowsApplied {
        pattern_name: config.name.clone(),
        timestamp: Instant::now(),
        updated,
        inserted,
    });

    persist_cursor(properties, clock).await?;
    config.event_listeners.emit(&DeltaEvent::CursorPersisted {
        pattern_name: config.name.clone(),
        timestamp: Instant::now(),
    });

    Ok(())
}

/// Runs the simpler full-import bootstrap used when no cursor exists: walks
/// `workouts` end-to-end, projects every row, writes in one batch, and
/// persists the cursor.
pub async fn run_bootstrap_import<T, D, C, S, P, Pj>(
    client: &ResilientClient<T, D, C>,
    sheet: &S,
    properties: &P,
    projector: &Pj,
    sheet_name: &str,
    config: &DeltaConfig,
    clock: &C,
    cancel_check: Option<&dyn Fn() -> bool>,
) -> Result<u64, DeltaError>
where
    T: Transport,
    D: DurableStore,
    C: Clock,
    S: TabularStore,
    P: PropertyStore,
    Pj: WorkoutProjector,
{
    let pagination_config = PaginationConfig {
        max_pages: config.max_pages,
        inter_page_delay: config.inter_page_delay,
    };

    let mut rows: Vec<Vec<CellValue>> = Vec::new();

    let total = fetch_paginated::<_, _, _, _, _, std::convert::Infallible>(
        client,
        "workouts",
        config.page_size,
        "workouts",
        &[],
        &pagination_config,
        cancel_check,
        |items| {
            for workout in &items {
                rows.extend(projector.project(workout));
            }
            async { Ok(()) }
        },
    )
    .await?;

    if !rows.is_empty() {
        let columns = rows[0].len() as u32;
        let range = RangeRef::new(FIRST_DATA_ROW, 1, FIRST_DATA_ROW + rows.len() as u32 - 1, columns);
        sheet.write_range(sheet_name, range, rows).await?;
    }

    persist_cursor(properties, clock).await?;
    config.event_listeners.emit(&DeltaEvent::CursorPersisted {
        pattern_name: config.name.clone(),
        timestamp: Instant::now(),
    });

    Ok(total)
}

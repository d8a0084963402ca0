//! Shared row-projection plumbing for the three "replace everything"
//! resources (`exercises`, `routine_folders`, `routines`). Unlike
//! `workouts`, these endpoints have no event/delta variant in the upstream
//! API — every run walks the endpoint
//! end-to-end and replaces the sheet body in one batch, the same pattern
//! `hevy-sync-delta::run_bootstrap_import` uses for the workouts bootstrap.

use hevy_sync_client::ResilientClient;
use hevy_sync_core::{CellValue, Clock, DurableStore, RangeRef, SheetError, TabularStore};
use hevy_sync_pagination::{fetch_paginated, PaginationConfig};
use hevy_sync_transport::Transport;

/// First row below the header that holds data (row 1 is the header row).
pub const FIRST_DATA_ROW: u32 = 2;

/// Walks `path` end-to-end via the pagination engine, projects each item
/// through `project_row`, and replaces the sheet body below the header row
/// in a single clear-then-write (no incremental per-page writes — the
/// sheet has no stable row identity to diff against until it's been fully
/// re-read, so a page-at-a-time write would leave stale trailing rows from
/// a previous, larger run).
#[allow(clippy::too_many_arguments)]
pub async fn replace_sheet_from_endpoint<T, D, C, S, F>(
    client: &ResilientClient<T, D, C>,
    sheet: &S,
    sheet_name: &str,
    path: &str,
    data_key: &str,
    page_size: u32,
    pagination_config: &PaginationConfig,
    cancel_check: Option<&(dyn Fn() -> bool + Send + Sync)>,
    project_row: F,
) -> Result<u64, crate::error::SyncError>
where
    T: Transport,
    D: DurableStore,
    C: Clock,
    S: TabularStore,
    F: Fn(&serde_json::Value) -> Vec<CellValue>,
{
    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    let sync_cancel: Option<&dyn Fn() -> bool> = cancel_check.map(|c| -> &dyn Fn() -> bool { c });

    let total = fetch_paginated::<_, _, _, _, _, SheetError>(
        client,
        path,
        page_size,
        data_key,
        &[],
        pagination_config,
        sync_cancel,
        |items| {
            for item in &items {
                rows.push(project_row(item));
            }
            async { Ok(()) }
        },
    )
    .await?;

    let last_row = sheet.last_row(sheet_name).await?;
    let last_col = sheet.last_column(sheet_name).await?.max(rows.first().map(|r| r.len() as u32).unwrap_or(1));

    if last_row >= FIRST_DATA_ROW {
        sheet
            .clear_range(sheet_name, RangeRef::new(FIRST_DATA_ROW, 1, last_row, last_col.max(1)))
            .await?;
    }

    if !rows.is_empty() {
        let columns = rows.iter().map(Vec::len).max().unwrap_or(1) as u32;
        let range = RangeRef::new(FIRST_DATA_ROW, 1, FIRST_DATA_ROW + rows.len() as u32 - 1, columns);
        sheet.write_range(sheet_name, range, rows).await?;
    }

    Ok(total)
}

/// Reads a JSON field as text, falling back to [`CellValue::Empty`] for a
/// missing or non-scalar field.
pub fn text_cell(value: &serde_json::Value, field: &str) -> CellValue {
    match value.get(field) {
        Some(serde_json::Value::String(s)) => CellValue::Text(s.clone()),
        Some(serde_json::Value::Number(n)) => n
            .as_f64()
            .map(CellValue::Number)
            .unwrap_or(CellValue::Empty),
        Some(serde_json::Value::Bool(b)) => CellValue::Text(b.to_string()),
        _ => CellValue::Empty,
    }
}

/// Reads a JSON field as a number, falling back to [`CellValue::Empty`].
pub fn number_cell(value: &serde_json::Value, field: &str) -> CellValue {
    value
        .get(field)
        .and_then(serde_json::Value::as_f64)
        .map(CellValue::Number)
        .unwrap_or(CellValue::Empty)
}

/// Joins a JSON string array field with `, `, e.g. `secondary_muscles`.
pub fn joined_array_cell(value: &serde_json::Value, field: &str) -> CellValue {
    match value.get(field).and_then(serde_json::Value::as_array) {
        Some(items) => {
            let joined = items
                .iter()
                .filter_map(serde_json::Value::as_str)
                .collect::<Vec<_>>()
                .join(", ");
            CellValue::Text(joined)
        }
        None => CellValue::Empty,
    }
}

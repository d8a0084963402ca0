//! External-interface trait boundaries.
//!
//! These four collaborators are specified only at their interface; this
//! module gives them concrete Rust shapes since a real crate must compile
//! against *something*. They live here, in `hevy-sync-core`, rather
//! than in the root `hevy-sync` package: the Progress Tracker, the
//! Import Orchestrator, and the Delta Workout Import all need to
//! name these traits, and none of them may depend on the root package
//! (which depends on *them*). The root package still owns the *wiring* —
//! `SyncContext`, the concrete `ImportStep`s, and any host adapters — just
//! not the trait declarations themselves.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

/// An opaque cell value. The core treats tabular rows as ordered tuples of
/// these — no formatting or type coercion beyond text/number/empty belongs
/// here.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

/// A 1-based, inclusive row/column range within a named sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeRef {
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl RangeRef {
    pub fn new(start_row: u32, start_col: u32, end_row: u32, end_col: u32) -> Self {
        Self {
            start_row,
            start_col,
            end_row,
            end_col,
        }
    }

    pub fn rows(&self) -> u32 {
        self.end_row.saturating_sub(self.start_row) + 1
    }
}

#[derive(Debug, Error, Clone)]
pub enum SheetError {
    #[error("sheet '{0}' not found")]
    SheetNotFound(String),
    #[error("required column '{column}' missing from sheet '{sheet}'")]
    MissingColumn { sheet: String, column: String },
    #[error("tabular store operation failed: {0}")]
    Backend(String),
}

/// The tabular store: batch read/write primitives over a named
/// sheet. No formatting/theming concerns belong here — those stay with the
/// host's UI layer.
#[async_trait]
pub trait TabularStore: Send + Sync {
    async fn read_range(&self, sheet: &str, range: RangeRef) -> Result<Vec<Vec<CellValue>>, SheetError>;
    async fn write_range(&self, sheet: &str, range: RangeRef, rows: Vec<Vec<CellValue>>) -> Result<(), SheetError>;
    async fn clear_range(&self, sheet: &str, range: RangeRef) -> Result<(), SheetError>;
    async fn insert_rows_at(&self, sheet: &str, at_row: u32, rows: Vec<Vec<CellValue>>) -> Result<(), SheetError>;
    async fn last_row(&self, sheet: &str) -> Result<u32, SheetError>;
    async fn last_column(&self, sheet: &str) -> Result<u32, SheetError>;
    async fn get_sheet_by_name(&self, sheet: &str) -> Result<(), SheetError>;
}

/// The durable key/value property store. A single trait used
/// uniformly for every key the core needs — `HEVY_API_KEY`,
/// `LAST_WORKOUT_UPDATE`, `IMPORT_PROGRESS`, `IMPORT_ACTIVE` — leaving the
/// choice of backing scope (user-level vs. document-level) entirely up to
/// the host's implementation of this trait.
#[async_trait]
pub trait PropertyStore: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: &str);
    async fn delete(&self, key: &str);
}

/// Opaque identifier for a registered timer handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandlerId(pub u64);

/// Opaque identifier for a scheduled (pending) timer invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScheduledTimerId(pub u64);

/// One-shot/deferred execution facility: "invoke handler H at
/// absolute time T", used to reschedule the initial import so the key-save
/// UI can close promptly.
pub trait Timer: Send + Sync {
    fn schedule(&self, at: DateTime<Utc>, handler: TimerHandlerId) -> ScheduledTimerId;
    fn cancel(&self, id: ScheduledTimerId);
    fn pending(&self) -> Vec<ScheduledTimerId>;
}

/// The three choices a resume prompt can yield.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeChoice {
    Resume,
    Restart,
    Cancel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Warning,
    Error,
}

/// Modal user-dialog primitives. Implementations live in the
/// host environment; the core only calls through this boundary.
#[async_trait]
pub trait Dialog: Send + Sync {
    async fn prompt_resume_choice(&self) -> ResumeChoice;
    async fn show_initial_setup(&self);
    async fn show_reenter_key(&self);
    async fn notify(&self, message: &str, level: NoticeLevel);
}

/// An in-memory [`PropertyStore`] and [`TabularStore`], used in tests
/// throughout the workspace and by hosts with no native equivalents of
/// their own.
#[cfg(any(test, feature = "test-util"))]
pub mod in_memory {
    use super::{CellValue, PropertyStore, RangeRef, SheetError, TabularStore};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    #[derive(Default)]
    pub struct InMemoryPropertyStore {
        entries: Mutex<HashMap<String, String>>,
    }

    impl InMemoryPropertyStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl PropertyStore for InMemoryPropertyStore {
        async fn get(&self, key: &str) -> Option<String> {
            self.entries.lock().await.get(key).cloned()
        }

        async fn set(&self, key: &str, value: &str) {
            self.entries
                .lock()
                .await
                .insert(key.to_string(), value.to_string());
        }

        async fn delete(&self, key: &str) {
            self.entries.lock().await.remove(key);
        }
    }

    /// A sheet is a dense, 1-indexed grid (`grid[0]` is row 1); rows shorter
    /// than a requested column read back as [`CellValue::Empty`].
    #[derive(Default)]
    pub struct InMemoryTabularStore {
        sheets: Mutex<HashMap<String, Vec<Vec<CellValue>>>>,
    }

    impl InMemoryTabularStore {
        pub fn new() -> Self {
            Self::default()
        }

        /// Test helper: replaces a sheet's entire grid, bypassing the
        /// 1-based range arithmetic `write_range` would otherwise require.
        pub async fn seed(&self, sheet: &str, rows: Vec<Vec<CellValue>>) {
            self.sheets.lock().await.insert(sheet.to_string(), rows);
        }

        /// Test helper: returns a sheet's full grid for assertions.
        pub async fn dump(&self, sheet: &str) -> Vec<Vec<CellValue>> {
            self.sheets.lock().await.get(sheet).cloned().unwrap_or_default()
        }
    }

    #[async_trait]
    impl TabularStore for InMemoryTabularStore {
        async fn read_range(&self, sheet: &str, range: RangeRef) -> Result<Vec<Vec<CellValue>>, SheetError> {
            let sheets = self.sheets.lock().await;
            let grid = sheets.get(sheet).ok_or_else(|| SheetError::SheetNotFound(sheet.to_string()))?;

            let mut out = Vec::new();
            for row in range.start_row..=range.end_row {
                let full_row = grid.get(row as usize - 1).cloned().unwrap_or_default();
                let mut sliced = Vec::new();
                for col in range.start_col..=range.end_col {
                    sliced.push(full_row.get(col as usize - 1).cloned().unwrap_or(CellValue::Empty));
                }
                out.push(sliced);
            }
            Ok(out)
        }

        async fn write_range(&self, sheet: &str, range: RangeRef, rows: Vec<Vec<CellValue>>) -> Result<(), SheetError> {
            let mut sheets = self.sheets.lock().await;
            let grid = sheets.entry(sheet.to_string()).or_default();

            for (offset, row_data) in rows.into_iter().enumerate() {
                let row = range.start_row as usize + offset;
                while grid.len() < row {
                    grid.push(Vec::new());
                }
                let target = &mut grid[row - 1];
                for (col_offset, value) in row_data.into_iter().enumerate() {
                    let col = range.start_col as usize + col_offset;
                    while target.len() < col {
                        target.push(CellValue::Empty);
                    }
                    target[col - 1] = value;
                }
            }
            Ok(())
        }

        async fn clear_range(&self, sheet: &str, range: RangeRef) -> Result<(), SheetError> {
            let mut sheets = self.sheets.lock().await;
            let Some(grid) = sheets.get_mut(sheet) else {
                return Ok(());
            };

            for row in range.start_row..=range.end_row {
                let Some(target) = grid.get_mut(row as usize - 1) else {
                    continue;
                };
                for col in range.start_col..=range.end_col {
                    if let Some(cell) = target.get_mut(col as usize - 1) {
                        *cell = CellValue::Empty;
                    }
                }
            }
            Ok(())
        }

        async fn insert_rows_at(&self, sheet: &str, at_row: u32, rows: Vec<Vec<CellValue>>) -> Result<(), SheetError> {
            let mut sheets = self.sheets.lock().await;
            let grid = sheets.entry(sheet.to_string()).or_default();
            let index = ((at_row as usize).saturating_sub(1)).min(grid.len());

            for (offset, row) in rows.into_iter().enumerate() {
                grid.insert(index + offset, row);
            }
            Ok(())
        }

        async fn last_row(&self, sheet: &str) -> Result<u32, SheetError> {
            let sheets = self.sheets.lock().await;
            Ok(sheets.get(sheet).map(|grid| grid.len() as u32).unwrap_or(0))
        }

        async fn last_column(&self, sheet: &str) -> Result<u32, SheetError> {
            let sheets = self.sheets.lock().await;
            Ok(sheets
                .get(sheet)
                .and_then(|grid| grid.iter().map(Vec::len).max())
                .unwrap_or(0) as u32)
        }

        async fn get_sheet_by_name(&self, sheet: &str) -> Result<(), SheetError> {
            let sheets = self.sheets.lock().await;
            if sheets.contains_key(sheet) {
                Ok(())
            } else {
                Err(SheetError::SheetNotFound(sheet.to_string()))
            }
        }
    }

}

//! The host-specific mapping between a workout JSON object and the rows it
//! occupies in the tabular store. The core treats rows as "opaque ordered
//! tuples" and leaves the exact column layout to the host; this trait is the
//! seam the delta import calls through rather than hard-coding a schema.

use hevy_sync_core::CellValue;
use serde_json::Value;

/// Projects workouts to/from tabular rows and identifies them by id.
pub trait WorkoutProjector: Send + Sync {
    /// The 0-based column index (within a projected row) carrying the
    /// workout id. Used to validate the sheet has an id column before the
    /// delete phase reads it.
    fn id_column(&self) -> usize;

    /// Extracts the workout id from a fetched JSON object.
    fn workout_id(&self, workout: &Value) -> Option<String>;

    /// Projects one workout into its table rows: one row per set, or a
    /// single placeholder row for a workout with no exercises.
    fn project(&self, workout: &Value) -> Vec<Vec<CellValue>>;

    /// Extracts the workout id from an existing table row, using
    /// [`Self::id_column`].
    fn row_id(&self, row: &[CellValue]) -> Option<String> {
        row.get(self.id_column())
            .and_then(CellValue::as_text)
            .map(str::to_string)
    }
}

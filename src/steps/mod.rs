//! Concrete [`hevy_sync_orchestrator::ImportStep`] implementations — a
//! complete agent needs concrete steps, not just the engine.

mod common;
pub mod exercises;
pub mod projector;
pub mod routine_folders;
pub mod routines;
pub mod workouts;

pub use exercises::{ExercisesStep, EXERCISES_SHEET};
pub use projector::{HevyWorkoutProjector, WORKOUTS_SHEET};
pub use routine_folders::{RoutineFoldersStep, ROUTINE_FOLDERS_SHEET};
pub use routines::{RoutinesStep, ROUTINES_SHEET};
pub use workouts::WorkoutsStep;

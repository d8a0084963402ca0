//! The `exercises` import step: walks `exercise_templates`, projects each
//! template into a row, and replaces the `Exercises` sheet body. Runs first
//! in the step sequence — `workouts` depends on the exercise ID↔title map
//! this step materializes.

use async_trait::async_trait;
use hevy_sync_client::ResilientClient;
use hevy_sync_core::{Clock, DurableStore, TabularStore};
use hevy_sync_orchestrator::ImportStep;
use hevy_sync_pagination::PaginationConfig;
use hevy_sync_transport::Transport;
use std::sync::Arc;

use crate::error::SyncError;
use crate::steps::common::{joined_array_cell, replace_sheet_from_endpoint, text_cell};

pub const EXERCISES_SHEET: &str = "Exercises";
const ENDPOINT: &str = "exercise_templates";
const DATA_KEY: &str = "exercise_templates";
const PAGE_SIZE: u32 = 100;

pub struct ExercisesStep<T: Transport, D: DurableStore, C: Clock, S: TabularStore> {
    client: Arc<ResilientClient<T, D, C>>,
    sheet: Arc<S>,
    pagination: PaginationConfig,
}

impl<T: Transport, D: DurableStore, C: Clock, S: TabularStore> ExercisesStep<T, D, C, S> {
    pub fn new(client: Arc<ResilientClient<T, D, C>>, sheet: Arc<S>, pagination: PaginationConfig) -> Self {
        Self { client, sheet, pagination }
    }
}

fn project_exercise(value: &serde_json::Value) -> Vec<hevy_sync_core::CellValue> {
    vec![
        text_cell(value, "id"),
        text_cell(value, "title"),
        text_cell(value, "type"),
        text_cell(value, "equipment"),
        text_cell(value, "primary_muscle_group"),
        joined_array_cell(value, "secondary_muscle_groups"),
        text_cell(value, "is_custom"),
    ]
}

#[async_trait]
impl<T, D, C, S> ImportStep<SyncError> for ExercisesStep<T, D, C, S>
where
    T: Transport,
    D: DurableStore,
    C: Clock,
    S: TabularStore,
{
    fn name(&self) -> &'static str {
        "exercises"
    }

    async fn run(&self, cancel: &(dyn Fn() -> bool + Send + Sync)) -> Result<(), SyncError> {
        replace_sheet_from_endpoint(
            &self.client,
            self.sheet.as_ref(),
            EXERCISES_SHEET,
            ENDPOINT,
            DATA_KEY,
            PAGE_SIZE,
            &self.pagination,
            Some(cancel),
            project_exercise,
        )
        .await?;
        Ok(())
    }
}

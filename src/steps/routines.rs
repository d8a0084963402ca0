//! The `routines` import step.

use async_trait::async_trait;
use hevy_sync_client::ResilientClient;
use hevy_sync_core::{Clock, DurableStore, TabularStore};
use hevy_sync_orchestrator::ImportStep;
use hevy_sync_pagination::PaginationConfig;
use hevy_sync_transport::Transport;
use std::sync::Arc;

use crate::error::SyncError;
use crate::steps::common::{replace_sheet_from_endpoint, text_cell};

pub const ROUTINES_SHEET: &str = "Routines";
const ENDPOINT: &str = "routines";
const DATA_KEY: &str = "routines";
const PAGE_SIZE: u32 = 100;

pub struct RoutinesStep<T: Transport, D: DurableStore, C: Clock, S: TabularStore> {
    client: Arc<ResilientClient<T, D, C>>,
    sheet: Arc<S>,
    pagination: PaginationConfig,
}

impl<T: Transport, D: DurableStore, C: Clock, S: TabularStore> RoutinesStep<T, D, C, S> {
    pub fn new(client: Arc<ResilientClient<T, D, C>>, sheet: Arc<S>, pagination: PaginationConfig) -> Self {
        Self { client, sheet, pagination }
    }
}

fn project_routine(value: &serde_json::Value) -> Vec<hevy_sync_core::CellValue> {
    vec![
        text_cell(value, "id"),
        text_cell(value, "title"),
        text_cell(value, "folder_id"),
        text_cell(value, "updated_at"),
    ]
}

#[async_trait]
impl<T, D, C, S> ImportStep<SyncError> for RoutinesStep<T, D, C, S>
where
    T: Transport,
    D: DurableStore,
    C: Clock,
    S: TabularStore,
{
    fn name(&self) -> &'static str {
        "routines"
    }

    async fn run(&self, cancel: &(dyn Fn() -> bool + Send + Sync)) -> Result<(), SyncError> {
        replace_sheet_from_endpoint(
            &self.client,
            self.sheet.as_ref(),
            ROUTINES_SHEET,
            ENDPOINT,
            DATA_KEY,
            PAGE_SIZE,
            &self.pagination,
            Some(cancel),
            project_routine,
        )
        .await?;
        Ok(())
    }
}

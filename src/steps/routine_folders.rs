//! The `routine_folders` import step. Independent of `exercises` and
//! `routines` in the step sequence — this implementation
//! runs it sequentially like the others (DESIGN.md records why the
//! concurrent-and-independent ordering hint isn't exploited as real
//! parallelism).

use async_trait::async_trait;
use hevy_sync_client::ResilientClient;
use hevy_sync_core::{Clock, DurableStore, TabularStore};
use hevy_sync_orchestrator::ImportStep;
use hevy_sync_pagination::PaginationConfig;
use hevy_sync_transport::Transport;
use std::sync::Arc;

use crate::error::SyncError;
use crate::steps::common::{number_cell, replace_sheet_from_endpoint, text_cell};

pub const ROUTINE_FOLDERS_SHEET: &str = "Routine Folders";
const ENDPOINT: &str = "routine_folders";
const DATA_KEY: &str = "routine_folders";
const PAGE_SIZE: u32 = 100;

pub struct RoutineFoldersStep<T: Transport, D: DurableStore, C: Clock, S: TabularStore> {
    client: Arc<ResilientClient<T, D, C>>,
    sheet: Arc<S>,
    pagination: PaginationConfig,
}

impl<T: Transport, D: DurableStore, C: Clock, S: TabularStore> RoutineFoldersStep<T, D, C, S> {
    pub fn new(client: Arc<ResilientClient<T, D, C>>, sheet: Arc<S>, pagination: PaginationConfig) -> Self {
        Self { client, sheet, pagination }
    }
}

fn project_folder(value: &serde_json::Value) -> Vec<hevy_sync_core::CellValue> {
    vec![
        text_cell(value, "id"),
        text_cell(value, "title"),
        number_cell(value, "index"),
        text_cell(value, "updated_at"),
    ]
}

#[async_trait]
impl<T, D, C, S> ImportStep<SyncError> for RoutineFoldersStep<T, D, C, S>
where
    T: Transport,
    D: DurableStore,
    C: Clock,
    S: TabularStore,
{
    fn name(&self) -> &'static str {
        "routineFolders"
    }

    async fn run(&self, cancel: &(dyn Fn() -> bool + Send + Sync)) -> Result<(), SyncError> {
        replace_sheet_from_endpoint(
            &self.client,
            self.sheet.as_ref(),
            ROUTINE_FOLDERS_SHEET,
            ENDPOINT,
            DATA_KEY,
            PAGE_SIZE,
            &self.pagination,
            Some(cancel),
            project_folder,
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hevy_sync_breaker::{BreakerConfig, CircuitBreaker};
    use hevy_sync_cache::{CacheConfig, ResponseCache};
    use hevy_sync_client::ClientConfig;
    use hevy_sync_core::durable::in_memory::InMemoryDurableStore;
    use hevy_sync_core::interfaces::in_memory::InMemoryTabularStore;
    use hevy_sync_core::{CellValue, TestClock};
    use hevy_sync_ratelimit::{RateLimitConfig, RateLimitTracker};
    use hevy_sync_transport::fake::ScriptedTransport;
    use hevy_sync_transport::HttpExecutor;
    use serde_json::json;
    use std::time::Duration;

    fn make_client(
        transport: Arc<ScriptedTransport>,
    ) -> ResilientClient<ScriptedTransport, InMemoryDurableStore<TestClock>, TestClock> {
        let clock = Arc::new(TestClock::default());
        let durable = Arc::new(InMemoryDurableStore::new(Arc::clone(&clock)));
        let executor = HttpExecutor::new(transport, "https://api.example.com", "test-key");
        let breaker = CircuitBreaker::new(BreakerConfig::new("t", 5.0, Duration::from_millis(60_000)), Arc::clone(&clock));
        let cache = ResponseCache::new(CacheConfig::new("t", 100, Duration::from_secs(600)), Arc::clone(&durable));
        let ratelimit = RateLimitTracker::new(RateLimitConfig::new("t", Duration::from_secs(600)), durable, Arc::clone(&clock));
        let config = ClientConfig {
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            request_timeout: Duration::from_secs(1),
            validation_timeout: Duration::from_secs(1),
            max_retries: 3,
        };
        ResilientClient::new(executor, breaker, cache, ratelimit, clock, config)
    }

    #[tokio::test]
    async fn empty_page_leaves_sheet_empty() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, json!({"routine_folders": [], "page_count": 0}));
        let client = Arc::new(make_client(transport));
        let sheet = Arc::new(InMemoryTabularStore::new());

        let step = RoutineFoldersStep::new(client, Arc::clone(&sheet), PaginationConfig { max_pages: 10, inter_page_delay: Duration::from_millis(0) });
        step.run(&|| false).await.unwrap();

        assert_eq!(sheet.dump(ROUTINE_FOLDERS_SHEET).await, Vec::<Vec<CellValue>>::new());
    }
}

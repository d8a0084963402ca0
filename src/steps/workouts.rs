//! The `workouts` import step: delegates to the delta import
//! when a cursor exists in the property store, else to the full-import
//! bootstrap. Runs after `exercises` in the step sequence.

use async_trait::async_trait;
use hevy_sync_client::ResilientClient;
use hevy_sync_core::{Clock, DurableStore, PropertyStore, TabularStore};
use hevy_sync_delta::{run_bootstrap_import, run_delta_import, DeltaConfig, LAST_WORKOUT_UPDATE_KEY};
use hevy_sync_orchestrator::ImportStep;
use hevy_sync_transport::Transport;
use std::sync::Arc;

use crate::error::SyncError;
use crate::steps::projector::{HevyWorkoutProjector, WORKOUTS_SHEET};

pub struct WorkoutsStep<T: Transport, D: DurableStore, C: Clock, S: TabularStore, P: PropertyStore> {
    client: Arc<ResilientClient<T, D, C>>,
    sheet: Arc<S>,
    properties: Arc<P>,
    clock: Arc<C>,
    config: DeltaConfig,
}

impl<T: Transport, D: DurableStore, C: Clock, S: TabularStore, P: PropertyStore> WorkoutsStep<T, D, C, S, P> {
    pub fn new(
        client: Arc<ResilientClient<T, D, C>>,
        sheet: Arc<S>,
        properties: Arc<P>,
        clock: Arc<C>,
        config: DeltaConfig,
    ) -> Self {
        Self { client, sheet, properties, clock, config }
    }
}

#[async_trait]
impl<T, D, C, S, P> ImportStep<SyncError> for WorkoutsStep<T, D, C, S, P>
where
    T: Transport,
    D: DurableStore,
    C: Clock,
    S: TabularStore,
    P: PropertyStore,
{
    fn name(&self) -> &'static str {
        "workouts"
    }

    async fn run(&self, cancel: &(dyn Fn() -> bool + Send + Sync)) -> Result<(), SyncError> {
        let projector = HevyWorkoutProjector;
        let cursor = self.properties.get(LAST_WORKOUT_UPDATE_KEY).await;

        match cursor {
            Some(cursor) => {
                run_delta_import(
                    &self.client,
                    self.sheet.as_ref(),
                    self.properties.as_ref(),
                    &projector,
                    WORKOUTS_SHEET,
                    &cursor,
                    &self.config,
                    self.clock.as_ref(),
                    Some(cancel),
                )
                .await?;
            }
            None => {
                let unsync_cancel: &dyn Fn() -> bool = cancel;
                run_bootstrap_import(
                    &self.client,
                    self.sheet.as_ref(),
                    self.properties.as_ref(),
                    &projector,
                    WORKOUTS_SHEET,
                    &self.config,
                    self.clock.as_ref(),
                    Some(unsync_cancel),
                )
                .await?;
            }
        }

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
    use hevy_sync_core::interfaces::in_memory::{InMemoryPropertyStore, InMemoryTabularStore};
    use hevy_sync_core::TestClock;
    use hevy_sync_ratelimit::{RateLimitConfig, RateLimitTracker};
    use hevy_sync_transport::fake::ScriptedTransport;
    use hevy_sync_transport::HttpExecutor;
    use serde_json::json;
    use std::time::Duration;

    fn make_client(
        transport: Arc<ScriptedTransport>,
        clock: Arc<TestClock>,
    ) -> ResilientClient<ScriptedTransport, InMemoryDurableStore<TestClock>, TestClock> {
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
    async fn no_cursor_runs_bootstrap_and_persists_cursor() {
        let clock = Arc::new(TestClock::default());
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, json!({"workouts": [{"id": "w1", "title": "Day 1", "exercises": []}]}));
        let client = Arc::new(make_client(transport, Arc::clone(&clock)));
        let sheet = Arc::new(InMemoryTabularStore::new());
        let properties = Arc::new(InMemoryPropertyStore::new());

        let step = WorkoutsStep::new(
            client,
            Arc::clone(&sheet),
            Arc::clone(&properties),
            Arc::clone(&clock),
            DeltaConfig::new("t", 10, Duration::from_millis(0), 1, 0.25, 50, 1000),
        );

        step.run(&|| false).await.unwrap();

        assert!(properties.get(LAST_WORKOUT_UPDATE_KEY).await.is_some());
        let dump = sheet.dump(WORKOUTS_SHEET).await;
        assert_eq!(dump[1][0], hevy_sync_core::CellValue::Text("w1".into()));
    }

    #[tokio::test]
    async fn existing_cursor_runs_delta_path() {
        let clock = Arc::new(TestClock::default());
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, json!({"events": []}));
        let client = Arc::new(make_client(transport, Arc::clone(&clock)));
        let sheet = Arc::new(InMemoryTabularStore::new());
        let properties = Arc::new(InMemoryPropertyStore::new());
        properties.set(LAST_WORKOUT_UPDATE_KEY, "2026-01-01T00:00:00Z").await;

        let step = WorkoutsStep::new(
            client,
            sheet,
            Arc::clone(&properties),
            Arc::clone(&clock),
            DeltaConfig::new("t", 10, Duration::from_millis(0), 1, 0.25, 50, 1000),
        );

        step.run(&|| false).await.unwrap();

        let new_cursor = properties.get(LAST_WORKOUT_UPDATE_KEY).await.unwrap();
        assert_ne!(new_cursor, "2026-01-01T00:00:00Z");
    }
}

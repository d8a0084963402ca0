//! `SyncContext`: the injected-dependencies composition root, constructed
//! once at program entry and handed to every layer that would otherwise
//! reach for process-wide global state.
//!
//! Every component above the HTTP executor in the dependency order is wired
//! here: the resilient client over the breaker/cache/rate-limit tracker
//! and the transport, the progress tracker, and the
//! concrete import steps. The orchestrator is built per-call
//! from [`SyncContext::orchestrator`] rather than stored, since it borrows
//! the dialog/timer/lock the host supplies and those don't need to outlive
//! one `run_full_import` call.

use std::sync::Arc;
use std::time::Duration;

use hevy_sync_breaker::{BreakerConfig, CircuitBreaker};
use hevy_sync_cache::{CacheConfig, ResponseCache};
use hevy_sync_client::{ClientConfig, ResilientClient};
use hevy_sync_core::{Clock, Dialog, DurableStore, PropertyStore, SyncConfig, TabularStore, Timer};
use hevy_sync_delta::DeltaConfig;
use hevy_sync_orchestrator::{ImportLock, ImportStep, Orchestrator, OrchestratorConfig};
use hevy_sync_pagination::PaginationConfig;
use hevy_sync_progress::{ProgressConfig, ProgressTracker};
use hevy_sync_ratelimit::{RateLimitConfig, RateLimitTracker};
use hevy_sync_transport::{HttpExecutor, Transport};

use crate::error::SyncError;
use crate::steps::{ExercisesStep, RoutineFoldersStep, RoutinesStep, WorkoutsStep};

/// How many rows/page a single `GET` over a paginated endpoint requests.
/// Not part of the crate-wide tunable table (which only fixes cursor/event
/// page behavior); chosen once here so every concrete step agrees.
const DEFAULT_PAGE_SIZE: u32 = 100;

/// Everything a host environment needs to provide to embed this agent,
/// plus the component graph built from it.
pub struct SyncContext<T, D, C, S, P, Dg, Tm, L>
where
    T: Transport,
    D: DurableStore,
    C: Clock,
    S: TabularStore,
    P: PropertyStore,
    Dg: Dialog,
    Tm: Timer,
    L: ImportLock,
{
    client: Arc<ResilientClient<T, D, C>>,
    sheets: Arc<S>,
    properties: Arc<P>,
    dialog: Arc<Dg>,
    timer: Arc<Tm>,
    lock: Arc<L>,
    clock: Arc<C>,
    config: SyncConfig,
}

impl<T, D, C, S, P, Dg, Tm, L> SyncContext<T, D, C, S, P, Dg, Tm, L>
where
    T: Transport,
    D: DurableStore,
    C: Clock,
    S: TabularStore,
    P: PropertyStore,
    Dg: Dialog,
    Tm: Timer,
    L: ImportLock,
{
    /// Builds the client stack from the host's transport, durable
    /// store, and clock, then wraps the remaining host collaborators
    /// (tabular store, property store, dialog, timer, lock) alongside it.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        transport: Arc<T>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        durable: Arc<D>,
        sheets: Arc<S>,
        properties: Arc<P>,
        dialog: Arc<Dg>,
        timer: Arc<Tm>,
        lock: Arc<L>,
        clock: Arc<C>,
        config: SyncConfig,
    ) -> Self {
        let executor = HttpExecutor::new(transport, base_url, api_key);
        let breaker = CircuitBreaker::new(
            BreakerConfig::new("hevy-sync", config.failure_threshold, config.reset_duration),
            Arc::clone(&clock),
        );
        let cache = ResponseCache::new(CacheConfig::from_sync_config("hevy-sync", &config), Arc::clone(&durable));
        let ratelimit = RateLimitTracker::new(
            RateLimitConfig::from_sync_config("hevy-sync", &config),
            durable,
            Arc::clone(&clock),
        );
        let client = Arc::new(ResilientClient::new(
            executor,
            breaker,
            cache,
            ratelimit,
            Arc::clone(&clock),
            ClientConfig::from_sync_config(&config),
        ));

        Self { client, sheets, properties, dialog, timer, lock, clock, config }
    }

    pub fn client(&self) -> &Arc<ResilientClient<T, D, C>> {
        &self.client
    }

    fn pagination_config(&self) -> PaginationConfig {
        PaginationConfig::from_sync_config(&self.config)
    }

    fn delta_config(&self) -> DeltaConfig {
        let mut cfg = DeltaConfig::from_sync_config("hevy-sync", &self.config);
        cfg.page_size = DEFAULT_PAGE_SIZE;
        cfg
    }

    /// The `exercises`, `routineFolders`, `routines`, `workouts` step
    /// sequence. `workouts` runs last because it depends on the exercise
    /// ID↔title map the `exercises` step builds.
    pub fn full_import_steps(&self) -> Vec<Arc<dyn ImportStep<SyncError>>> {
        vec![
            Arc::new(ExercisesStep::new(Arc::clone(&self.client), Arc::clone(&self.sheets), self.pagination_config())),
            Arc::new(RoutineFoldersStep::new(Arc::clone(&self.client), Arc::clone(&self.sheets), self.pagination_config())),
            Arc::new(RoutinesStep::new(Arc::clone(&self.client), Arc::clone(&self.sheets), self.pagination_config())),
            Arc::new(WorkoutsStep::new(
                Arc::clone(&self.client),
                Arc::clone(&self.sheets),
                Arc::clone(&self.properties),
                Arc::clone(&self.clock),
                self.delta_config(),
            )),
        ]
    }

    /// The template-spreadsheet step sequence.
    pub fn template_import_steps(&self) -> Vec<Arc<dyn ImportStep<SyncError>>> {
        vec![Arc::new(ExercisesStep::new(
            Arc::clone(&self.client),
            Arc::clone(&self.sheets),
            self.pagination_config(),
        ))]
    }

    /// Builds the orchestrator for one `run_full_import` call.
    pub fn orchestrator(&self) -> Orchestrator<P, Dg, Tm, C, L, SyncError> {
        let progress_config = ProgressConfig::from_sync_config("hevy-sync", &self.config);
        let progress = Arc::new(ProgressTracker::new(progress_config, Arc::clone(&self.properties), Arc::clone(&self.clock)));
        let orchestrator_config = OrchestratorConfig::from_sync_config("hevy-sync", &self.config);

        Orchestrator::new(
            orchestrator_config,
            Arc::clone(&self.properties),
            Arc::clone(&self.dialog),
            Arc::clone(&self.timer),
            Arc::clone(&self.clock),
            Arc::clone(&self.lock),
            progress,
        )
    }

    pub fn lock_wait(&self) -> Duration {
        self.config.lock_wait
    }
}

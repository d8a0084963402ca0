//! `hevy-sync`: a one-way synchronization agent that ingests fitness-
//! tracking data (exercises, workouts, routines, routine folders) from a
//! third-party REST API and materializes it into a tabular persistent
//! store.
//!
//! This is the root package a host environment embeds. It owns the four
//! external-interface trait boundaries (`TabularStore`, `PropertyStore`,
//! `Timer`, `Dialog` — re-exported from [`hevy_sync_core`]), the concrete
//! import step definitions, API key validation, and [`SyncContext`], which
//! wires every lower-layer component (circuit breaker, response cache,
//! rate-limit tracker, HTTP executor, resilient client, pagination engine,
//! progress tracker, orchestrator, delta import) into the single object a
//! host constructs once at program entry.
//!
//! The hard engineering — circuit breaking, retry-with-backoff, the
//! two-tier cache, pagination, resumable orchestration, and event-driven
//! delta reconciliation — lives in the `hevy-sync-*` component crates this
//! package depends on.

mod context;
mod error;
mod key;
pub mod steps;

pub use context::SyncContext;
pub use error::SyncError;
pub use key::{parse_api_key, ApiKey, ValidationError};

/// Re-exports of the lower-layer crates, for hosts that need to reach past
/// `SyncContext` (e.g. to register an [`hevy_sync_core::EventListener`] or
/// construct a [`hevy_sync_transport::fake::ScriptedTransport`] in their own
/// tests).
pub mod prelude {
    pub use hevy_sync_breaker::{BreakerConfig, CircuitBreaker, CircuitOpenError, CircuitState};
    pub use hevy_sync_cache::{CacheConfig, Fingerprint, ResponseCache};
    pub use hevy_sync_client::{ClientConfig, ClientError, ResilientClient};
    pub use hevy_sync_core::{
        CellValue, Clock, Dialog, DurableStore, NoticeLevel, PropertyStore, RangeRef, ResumeChoice,
        SheetError, SyncConfig, SystemClock, TabularStore, TestClock, Timer,
    };
    pub use hevy_sync_delta::{DeltaConfig, DeltaError, WorkoutProjector};
    pub use hevy_sync_orchestrator::{
        ImportLock, ImportStep, InMemoryImportLock, Orchestrator, OrchestratorConfig, OrchestratorError,
        RunOutcome, StepError,
    };
    pub use hevy_sync_pagination::{PaginationConfig, PaginationError};
    pub use hevy_sync_progress::{ImportProgressRecord, ProgressConfig, ProgressTracker};
    pub use hevy_sync_ratelimit::{RateLimitConfig, RateLimitSnapshot, RateLimitTracker};
    pub use hevy_sync_transport::{HttpMethod, Payload, ReqwestTransport, RequestBody, Transport};

    pub use crate::context::SyncContext;
    pub use crate::error::SyncError;
    pub use crate::key::{parse_api_key, ApiKey, ValidationError};
    pub use crate::steps::{ExercisesStep, HevyWorkoutProjector, RoutineFoldersStep, RoutinesStep, WorkoutsStep};
}

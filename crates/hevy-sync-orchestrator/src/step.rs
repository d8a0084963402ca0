//! The step abstraction deliberately leaves each step nameless to this
//! crate beyond its `name()` string — the orchestrator sequences steps
//! without knowing what they do. `hevy-sync` (the root crate) supplies the
//! concrete `exercises`/`routine_folders`/`routines`/`workouts`
//! implementations; this crate only needs the boundary.

use async_trait::async_trait;

/// The classification an [`ImportStep`]'s error must support so the
/// orchestrator can apply its error-mapping table without depending on a
/// concrete error enum.
pub trait StepError: std::fmt::Debug + std::fmt::Display + Send + Sync + 'static {
    /// True for an HTTP 401 anywhere in the step.
    fn is_unauthorized(&self) -> bool;

    /// True for a cooperative-cancellation error.
    fn is_cancelled(&self) -> bool;
}

/// One named unit of work in the orchestrator's step sequence. `cancel` is
/// the synchronous deadline check the orchestrator builds from its
/// wall-clock budget — steps pass it straight through to the pagination
/// engine or the delta import so their own loops can yield.
#[async_trait]
pub trait ImportStep<E: StepError>: Send + Sync {
    fn name(&self) -> &'static str;

    async fn run(&self, cancel: &(dyn Fn() -> bool + Send + Sync)) -> Result<(), E>;
}

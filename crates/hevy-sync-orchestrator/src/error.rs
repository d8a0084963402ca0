use thiserror::Error;

/// Surfaced only for the "any other error" branch of the step
/// error-mapping table: `CancelledByTimeout` and an unauthorized step error
/// are absorbed into a [`crate::RunOutcome`] instead of reaching here.
#[derive(Debug, Error)]
pub enum OrchestratorError<E: std::fmt::Debug + std::fmt::Display> {
    #[error("import step failed: {0}")]
    Step(E),
}

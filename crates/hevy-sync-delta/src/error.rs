use hevy_sync_client::ClientError;
use hevy_sync_core::SheetError;
use hevy_sync_pagination::PaginationError;
use thiserror::Error;

/// Errors from the delta workout import and the full-import
/// bootstrap variant.
#[derive(Debug, Error)]
pub enum DeltaError {
    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Pagination(#[from] PaginationError<std::convert::Infallible>),

    /// The failure-rate gate rejected the whole delta.
    #[error("{0}")]
    FailureGateRejected(String),

    /// Cooperative cancellation fired during the upsert-fetch phase.
    #[error("cancelled during delta workout import")]
    CancelledByTimeout,
}

impl DeltaError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, DeltaError::CancelledByTimeout)
            || matches!(self, DeltaError::Pagination(err) if err.is_cancelled())
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, DeltaError::Client(err) if err.is_invalid_api_key())
            || matches!(self, DeltaError::Pagination(err) if matches!(err, PaginationError::Client(c) if c.is_invalid_api_key()))
    }
}

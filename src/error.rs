//! The aggregate error surfaced by the concrete import steps, wrapping each
//! lower-layer component's own error type behind one enum.

use hevy_sync_client::ClientError;
use hevy_sync_core::SheetError;
use hevy_sync_delta::DeltaError;
use hevy_sync_orchestrator::StepError;
use hevy_sync_pagination::PaginationError;
use thiserror::Error;

use crate::key::ValidationError;

/// Errors a concrete [`hevy_sync_orchestrator::ImportStep`] can surface.
/// Every variant is one this crate's error-mapping needs to distinguish
/// (unauthorized vs. cancelled vs. everything else); none are invented
/// beyond that.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Delta(#[from] DeltaError),

    #[error(transparent)]
    Sheet(#[from] SheetError),

    #[error("{0}")]
    Validation(String),

    /// Cooperative cancellation from a step that drives the pagination
    /// engine directly rather than through the delta import.
    #[error("cancelled while paginating '{path}' at page {page}")]
    CancelledByTimeout { path: String, page: u32 },

    /// `MAX_PAGES` exceeded.
    #[error("exceeded page cap for '{path}' at page {page} (total so far: {total})")]
    PageCapExceeded { path: String, page: u32, total: u64 },
}

impl From<ValidationError> for SyncError {
    fn from(err: ValidationError) -> Self {
        SyncError::Validation(err.to_string())
    }
}

impl From<PaginationError<SheetError>> for SyncError {
    fn from(err: PaginationError<SheetError>) -> Self {
        match err {
            PaginationError::Client(e) => SyncError::Client(e),
            PaginationError::Callback(e) => SyncError::Sheet(e),
            PaginationError::CancelledByTimeout { path, page } => {
                SyncError::CancelledByTimeout { path, page }
            }
            PaginationError::PageCapExceeded { path, page, total } => {
                SyncError::PageCapExceeded { path, page, total }
            }
        }
    }
}

impl StepError for SyncError {
    fn is_unauthorized(&self) -> bool {
        match self {
            SyncError::Client(e) => e.is_invalid_api_key(),
            SyncError::Delta(e) => e.is_unauthorized(),
            _ => false,
        }
    }

    fn is_cancelled(&self) -> bool {
        match self {
            SyncError::CancelledByTimeout { .. } => true,
            SyncError::Delta(e) => e.is_cancelled(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cancelled_by_timeout_is_cancelled_not_unauthorized() {
        let err = SyncError::CancelledByTimeout { path: "/x".into(), page: 2 };
        assert!(err.is_cancelled());
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn validation_is_neither() {
        let err = SyncError::Validation("bad key".into());
        assert!(!err.is_cancelled());
        assert!(!err.is_unauthorized());
    }
}

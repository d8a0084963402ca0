use hevy_sync_client::ClientError;
use thiserror::Error;

/// Errors from [`crate::fetch_paginated`]. Generic over `E`, the error type
/// of the caller's per-page callback — writing rows into the tabular store
/// can fail for its own reasons, and that failure must propagate rather
/// than be swallowed.
#[derive(Debug, Error)]
pub enum PaginationError<E> {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("page callback failed: {0}")]
    Callback(E),

    /// Cooperative cancellation fired between page fetches. Never retried; the orchestrator absorbs this as a pause.
    #[error("cancelled while paginating '{path}' at page {page}")]
    CancelledByTimeout { path: String, page: u32 },

    /// `MAX_PAGES` exceeded — a hard ceiling against a misbehaving server.
    #[error("exceeded page cap for '{path}' at page {page} (total so far: {total})")]
    PageCapExceeded { path: String, page: u32, total: u64 },
}

impl<E> PaginationError<E> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PaginationError::CancelledByTimeout { .. })
    }
}

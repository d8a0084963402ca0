use hevy_sync_breaker::CircuitOpenError;
use hevy_sync_transport::{ExecutorError, TransportError};
use thiserror::Error;

/// Errors surfaced by [`crate::ResilientClient`]. Each variant carries the
/// minimum payload a caller needs to decide what to do next:
/// the breaker's remaining wait time, the HTTP status, or nothing at all
/// for a pure connectivity failure.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The breaker is open; this call never reached the transport and was
    /// never retried.
    #[error(transparent)]
    CircuitOpen(#[from] CircuitOpenError),

    /// Classification or transport failure from the executor, after the
    /// retry loop gave up.
    #[error(transparent)]
    Executor(#[from] ExecutorError),

    /// A network-class failure encountered during key validation specifically,
    /// rewritten to a user-facing connectivity message.
    #[error("please check your connection and try again")]
    ConnectionCheck,
}

impl ClientError {
    pub fn is_circuit_open(&self) -> bool {
        matches!(self, ClientError::CircuitOpen(_))
    }

    pub fn is_invalid_api_key(&self) -> bool {
        matches!(self, ClientError::Executor(ExecutorError::InvalidApiKey))
    }

    /// The HTTP status this error carries, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Executor(err) => err.status(),
            _ => None,
        }
    }

    /// True for the 404-on-paginated-endpoint "end of stream" signal.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub(crate) fn is_network_class(&self) -> bool {
        matches!(self, ClientError::Executor(ExecutorError::Transport(t)) if t.is_network_class())
    }
}

/// Rewrites a network-class transport failure from key validation into the
/// user-facing [`ClientError::ConnectionCheck`]. Anything
/// else (including a classified `InvalidApiKey`) passes through unchanged.
pub(crate) fn rewrite_validation_error(err: ExecutorError) -> ClientError {
    let client_err = ClientError::Executor(err);
    if client_err.is_network_class() {
        ClientError::ConnectionCheck
    } else {
        client_err
    }
}

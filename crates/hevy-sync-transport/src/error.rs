use thiserror::Error;

/// Transport-level failures: the call never produced a classifiable HTTP
/// response. Distinguished from [`ExecutorError`] so the Resilient Client's
/// key-validation wrapper can rewrite these specifically into a
/// user-facing "please check your connection" message.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("network error: {0}")]
    Network(String),
    #[error("dns error: {0}")]
    Dns(String),
    #[error("transport error: {0}")]
    Other(String),
}

impl TransportError {
    /// True for the "network-class" errors the key-validation wrapper
    /// rewrites into a connection-check notice.
    pub fn is_network_class(&self) -> bool {
        matches!(
            self,
            TransportError::Timeout | TransportError::Network(_) | TransportError::Dns(_)
        )
    }
}

/// Result of classifying an HTTP response.
#[derive(Debug, Clone, Error)]
pub enum ExecutorError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// 2xx with a body that did not parse as JSON.
    #[error("bad JSON in {status} response")]
    BadJson { status: u16, body: Vec<u8> },

    /// HTTP 401: the API key itself is invalid.
    #[error("invalid API key")]
    InvalidApiKey,

    /// Any other classified non-success status, carrying a stock message
    /// and the original body for diagnostics.
    #[error("{message}")]
    ApiError {
        status: u16,
        message: String,
        body: Vec<u8>,
    },

    /// The outgoing request body failed to JSON-encode. Never produced by
    /// the upstream server; raised before a request is even sent.
    #[error("failed to encode request body: {0}")]
    RequestEncoding(String),
}

impl ExecutorError {
    /// The HTTP status this error carries, if any (`Transport` errors have none).
    pub fn status(&self) -> Option<u16> {
        match self {
            ExecutorError::BadJson { status, .. } => Some(*status),
            ExecutorError::ApiError { status, .. } => Some(*status),
            ExecutorError::InvalidApiKey => Some(401),
            ExecutorError::Transport(_) | ExecutorError::RequestEncoding(_) => None,
        }
    }

    /// The retryable HTTP-status set the Resilient Client checks before
    /// retrying — a distinct, wider set than the breaker's transient-weight set.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ExecutorError::ApiError { status, .. }
                if matches!(status, 408 | 429 | 500 | 502 | 503 | 504)
        )
    }
}

/// Stock messages for the statuses this module classifies explicitly.
pub(crate) fn stock_message(status: u16) -> String {
    match status {
        400 => "Invalid request".to_string(),
        403 => "Access forbidden".to_string(),
        404 => "Resource not found".to_string(),
        429 => "Rate limit exceeded".to_string(),
        other => format!("API request failed with status {other}"),
    }
}

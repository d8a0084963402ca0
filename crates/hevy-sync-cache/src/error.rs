use thiserror::Error;

/// Raised only for diagnostics; a durable-tier failure is logged and
/// swallowed everywhere it's encountered rather than
/// propagated, so this type never crosses the cache's public API.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("durable tier write failed for '{key}': {message}")]
    DurableWriteFailed { key: String, message: String },
    #[error("cached payload for '{key}' could not be deserialized: {message}")]
    CorruptEntry { key: String, message: String },
}

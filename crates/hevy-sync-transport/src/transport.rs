//! The transport abstraction: an HTTP call behind an interface returning
//! `{status, headers, body}`, so the executor never talks to a concrete
//! HTTP client directly.

use crate::error::TransportError;
use crate::request::TransportRequest;
use crate::response::TransportResponse;
use async_trait::async_trait;

/// A pluggable HTTP transport. The production implementation is
/// [`crate::reqwest_transport::ReqwestTransport`]; tests use
/// [`crate::fake::ScriptedTransport`] (behind the `test-util` feature).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

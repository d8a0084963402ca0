//! HTTP Executor: the [`Transport`] abstraction over the
//! platform HTTP client, plus [`HttpExecutor`], which builds requests and
//! classifies responses into a [`Payload`] or an [`ExecutorError`].
//!
//! This crate owns the HTTP executor in full — both the transport boundary (so tests can
//! swap in [`fake::ScriptedTransport`]) and the request-building/response-
//! classification logic that sits directly on top of it. The Resilient
//! Client (`hevy-sync-client`) composes this with the breaker, cache, and
//! rate-limit tracker; it does not duplicate any of this crate's logic.

mod error;
mod executor;
mod payload;
mod request;
mod response;
mod transport;

pub mod reqwest_transport;

#[cfg(any(test, feature = "test-util"))]
pub mod fake;

pub use error::{ExecutorError, TransportError};
pub use executor::{ExecutedResponse, HttpExecutor, Query};
pub use payload::Payload;
pub use request::{HttpMethod, RequestBody, TransportRequest};
pub use response::TransportResponse;
pub use transport::Transport;
pub use reqwest_transport::ReqwestTransport;

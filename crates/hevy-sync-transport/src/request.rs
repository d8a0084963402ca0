//! Outbound request shapes.

use std::time::Duration;

/// HTTP method of an outbound request. The agent only ever issues GETs in
/// practice, but the Resilient Client's `request()` entry point is generic
/// over method, so the full set is modeled here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    pub fn is_get(self) -> bool {
        matches!(self, HttpMethod::Get)
    }
}

/// A request body: either already-encoded raw bytes, or a JSON value the
/// executor encodes just before sending.
#[derive(Debug, Clone)]
pub enum RequestBody {
    Raw(Vec<u8>),
    Json(serde_json::Value),
}

impl RequestBody {
    pub(crate) fn into_bytes(self) -> Result<Vec<u8>, serde_json::Error> {
        match self {
            RequestBody::Raw(bytes) => Ok(bytes),
            RequestBody::Json(value) => serde_json::to_vec(&value),
        }
    }
}

/// A fully-formed outbound request, ready for a [`crate::Transport`].
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
    pub timeout: Duration,
}

//! HTTP Executor: builds the final request, attaches the
//! standard headers, applies a per-request timeout, and classifies the
//! response into a [`Payload`] or an [`ExecutorError`].

use crate::error::{stock_message, ExecutorError};
use crate::payload::Payload;
use crate::request::{HttpMethod, RequestBody, TransportRequest};
use crate::response::TransportResponse;
use crate::transport::Transport;
use std::sync::Arc;
use std::time::Duration;

/// A query parameter list, already in whatever order the caller built it.
/// Fingerprinting (sorting) is the cache's job, not the executor's.
pub type Query<'a> = &'a [(String, String)];

/// Executes requests against a fixed base URL and API key.
pub struct HttpExecutor<T: Transport> {
    transport: Arc<T>,
    base_url: String,
    api_key: String,
}

impl<T: Transport> HttpExecutor<T> {
    pub fn new(transport: Arc<T>, base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            transport,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn build_url(&self, path: &str, query: Query<'_>) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        let mut url = format!("{base}/{path}");
        if !query.is_empty() {
            url.push('?');
            url.push_str(
                &query
                    .iter()
                    .map(|(k, v)| format!("{}={}", urlencode(k), urlencode(v)))
                    .collect::<Vec<_>>()
                    .join("&"),
            );
        }
        url
    }

    /// Issues a single request (no retry, no circuit breaker, no cache —
    /// that composition lives one layer up, in the Resilient Client).
    pub async fn execute(
        &self,
        path: &str,
        method: HttpMethod,
        query: Query<'_>,
        body: Option<RequestBody>,
        timeout: Duration,
    ) -> Result<ExecutedResponse, ExecutorError> {
        let url = self.build_url(path, query);
        let headers = vec![
            ("Accept".to_string(), "application/json".to_string()),
            ("Content-Type".to_string(), "application/json".to_string()),
            ("api-key".to_string(), self.api_key.clone()),
        ];

        let body_bytes = match body {
            Some(body) => Some(
                body.into_bytes()
                    .map_err(|e| ExecutorError::RequestEncoding(e.to_string()))?,
            ),
            None => None,
        };

        let request = TransportRequest {
            method,
            url,
            headers,
            body: body_bytes,
            timeout,
        };

        let response = self.transport.send(request).await?;
        classify(response)
    }
}

/// A classified successful response: the decoded payload plus the raw
/// headers, so the caller (Resilient Client) can feed them to the
/// rate-limit tracker.
pub struct ExecutedResponse {
    pub payload: Payload,
    pub headers: Vec<(String, String)>,
}

fn classify(response: TransportResponse) -> Result<ExecutedResponse, ExecutorError> {
    let TransportResponse { status, headers, body } = response;

    if status == 204 {
        return Ok(ExecutedResponse {
            payload: Payload::Empty,
            headers,
        });
    }

    if (200..300).contains(&status) {
        return match serde_json::from_slice::<serde_json::Value>(&body) {
            Ok(value) => Ok(ExecutedResponse {
                payload: Payload::Json(value),
                headers,
            }),
            Err(_) => Err(ExecutorError::BadJson { status, body }),
        };
    }

    if status == 401 {
        return Err(ExecutorError::InvalidApiKey);
    }

    Err(ExecutorError::ApiError {
        status,
        message: stock_message(status),
        body,
    })
}

fn urlencode(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

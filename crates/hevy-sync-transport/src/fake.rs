//! A scriptable [`Transport`] for tests, shared by every crate above this
//! one in the dependency order (client, pagination, orchestrator, delta).

use crate::error::TransportError;
use crate::request::TransportRequest;
use crate::response::TransportResponse;
use crate::transport::Transport;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Queues up responses (or errors) to return in order, one per `send()`
/// call, and records every request it receives for assertions.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_response(&self, response: TransportResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    pub fn push_json(&self, status: u16, body: serde_json::Value) {
        self.push_response(TransportResponse {
            status,
            headers: vec![],
            body: serde_json::to_vec(&body).unwrap(),
        });
    }

    pub fn push_json_with_headers(
        &self,
        status: u16,
        body: serde_json::Value,
        headers: Vec<(String, String)>,
    ) {
        self.push_response(TransportResponse {
            status,
            headers,
            body: serde_json::to_vec(&body).unwrap(),
        });
    }

    pub fn push_status(&self, status: u16) {
        self.push_response(TransportResponse {
            status,
            headers: vec![],
            body: vec![],
        });
    }

    pub fn push_error(&self, error: TransportError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Other("no scripted response queued".into())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::HttpMethod;
    use std::time::Duration;

    #[tokio::test]
    async fn returns_queued_responses_in_order() {
        let transport = ScriptedTransport::new();
        transport.push_status(200);
        transport.push_status(500);

        let req = |url: &str| TransportRequest {
            method: HttpMethod::Get,
            url: url.to_string(),
            headers: vec![],
            body: None,
            timeout: Duration::from_secs(1),
        };

        let first = transport.send(req("/a")).await.unwrap();
        assert_eq!(first.status, 200);
        let second = transport.send(req("/b")).await.unwrap();
        assert_eq!(second.status, 500);
        assert_eq!(transport.request_count(), 2);
    }
}

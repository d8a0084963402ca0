//! Production [`Transport`] backed by `reqwest`.

use crate::error::TransportError;
use crate::request::TransportRequest;
use crate::response::TransportResponse;
use crate::transport::Transport;
use async_trait::async_trait;

/// Wraps a single shared `reqwest::Client`. Cheap to clone; `reqwest`
/// already pools connections internally.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let method = match request.method {
            crate::request::HttpMethod::Get => reqwest::Method::GET,
            crate::request::HttpMethod::Post => reqwest::Method::POST,
            crate::request::HttpMethod::Put => reqwest::Method::PUT,
            crate::request::HttpMethod::Patch => reqwest::Method::PATCH,
            crate::request::HttpMethod::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self
            .client
            .request(method, &request.url)
            .timeout(request.timeout);

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(classify_send_error)?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(classify_send_error)?;

        Ok(TransportResponse { status, headers, body })
    }
}

fn classify_send_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::Timeout;
    }
    if err.is_connect() {
        return TransportError::Dns(err.to_string());
    }
    TransportError::Network(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_transport_constructs() {
        let _t = ReqwestTransport::default();
    }
}

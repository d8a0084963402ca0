//! Resilient Client: the single `request()` entry point that
//! composes the circuit breaker, response cache, rate-limit
//! tracker, and HTTP executor behind one retrying call.

mod backoff;
mod config;
mod error;

pub use config::ClientConfig;
pub use error::ClientError;
pub use hevy_sync_transport::{HttpMethod, Payload, RequestBody};

use hevy_sync_breaker::{CircuitBreaker, FailureKind};
use hevy_sync_cache::{Fingerprint, ResponseCache};
use hevy_sync_core::{Clock, DurableStore};
use hevy_sync_ratelimit::RateLimitTracker;
use hevy_sync_transport::{ExecutorError, HttpExecutor, Transport};
use rand::Rng;
use std::sync::Arc;

#[cfg(feature = "metrics")]
use metrics::histogram;

/// Lightweight endpoint used by [`ResilientClient::validate_key`] — cheap
/// enough to call on every "save API key" UI interaction.
pub const KEY_VALIDATION_ENDPOINT: &str = "/workouts/count";

/// Composes the four lower layers into the one client the rest of the
/// workspace depends on.
pub struct ResilientClient<T: Transport, D: DurableStore, C: Clock> {
    executor: HttpExecutor<T>,
    breaker: CircuitBreaker<C>,
    cache: ResponseCache<D>,
    ratelimit: RateLimitTracker<D, C>,
    clock: Arc<C>,
    config: ClientConfig,
}

impl<T: Transport, D: DurableStore, C: Clock> ResilientClient<T, D, C> {
    pub fn new(
        executor: HttpExecutor<T>,
        breaker: CircuitBreaker<C>,
        cache: ResponseCache<D>,
        ratelimit: RateLimitTracker<D, C>,
        clock: Arc<C>,
        config: ClientConfig,
    ) -> Self {
        Self {
            executor,
            breaker,
            cache,
            ratelimit,
            clock,
            config,
        }
    }

    /// The single public operation: executes `path` through the breaker,
    /// cache, rate-limit tracker, and retry loop. `query` is caller-ordered;
    /// the cache fingerprints it sorted, independent of the order the
    /// caller built it in.
    pub async fn request(
        &self,
        path: &str,
        method: HttpMethod,
        query: &[(String, String)],
        body: Option<RequestBody>,
    ) -> Result<Payload, ClientError> {
        self.breaker.check(path)?;

        let fingerprint = Fingerprint::new(path, query.iter().cloned());
        if method.is_get() {
            if let Some(cached) = self.cache.get(&fingerprint).await {
                return Ok(Payload::Json(cached));
            }
        }

        let mut last_error: Option<ExecutorError> = None;

        for attempt in 0..self.config.max_retries {
            let json_body = body.clone();
            let started = self.clock.now_instant();
            let outcome = self
                .executor
                .execute(path, method, query, json_body, self.config.request_timeout)
                .await;
            #[cfg(feature = "metrics")]
            {
                let elapsed = self.clock.now_instant().saturating_duration_since(started);
                histogram!("client_request_duration_seconds").record(elapsed.as_secs_f64());
            }
            #[cfg(not(feature = "metrics"))]
            let _ = started;

            match outcome {
                Ok(response) => {
                    self.ratelimit.observe(response.headers.iter().map(|(k, v)| (k.as_str(), v.as_str()))).await;
                    self.breaker.record_success();

                    if method.is_get() {
                        if let Some(value) = response.payload.as_json() {
                            self.cache.put(&fingerprint, value.clone()).await;
                        }
                    }

                    return Ok(response.payload);
                }
                Err(err) => {
                    let retryable = err.is_retryable() && attempt + 1 < self.config.max_retries;
                    if retryable {
                        #[cfg(feature = "tracing")]
                        tracing::debug!(%path, attempt, "retrying after transient failure");

                        let jitter = rand::thread_rng().gen::<f64>();
                        let delay = backoff::compute_delay(
                            attempt as u32,
                            self.config.base_delay,
                            self.config.max_delay,
                            jitter,
                        );
                        tokio::time::sleep(delay).await;
                        last_error = Some(err);
                        continue;
                    }

                    self.breaker.record_failure(failure_kind(&err));
                    return Err(err.into());
                }
            }
        }

        Err(last_error
            .expect("loop only exits here after at least one failed attempt")
            .into())
    }

    /// Thin wrapper issuing a short-timeout GET against
    /// [`KEY_VALIDATION_ENDPOINT`], bypassing the breaker, cache, and retry
    /// loop entirely.
    pub async fn validate_key(&self) -> Result<(), ClientError> {
        match self
            .executor
            .execute(
                KEY_VALIDATION_ENDPOINT,
                HttpMethod::Get,
                &[],
                None,
                self.config.validation_timeout,
            )
            .await
        {
            Ok(_) => Ok(()),
            Err(err) => Err(error::rewrite_validation_error(err)),
        }
    }

    pub fn breaker(&self) -> &CircuitBreaker<C> {
        &self.breaker
    }

    pub fn cache(&self) -> &ResponseCache<D> {
        &self.cache
    }

    pub fn ratelimit(&self) -> &RateLimitTracker<D, C> {
        &self.ratelimit
    }
}

/// Maps an executor error to the breaker's weight class (a `CircuitOpen`
/// never reaches this function — it's returned directly from `check()`
/// before the retry loop runs).
fn failure_kind(err: &ExecutorError) -> FailureKind {
    match err.status() {
        Some(status) => FailureKind::from_status(status),
        None => FailureKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hevy_sync_breaker::BreakerConfig;
    use hevy_sync_cache::CacheConfig;
    use hevy_sync_core::durable::in_memory::InMemoryDurableStore;
    use hevy_sync_core::TestClock;
    use hevy_sync_ratelimit::RateLimitConfig;
    use hevy_sync_transport::fake::ScriptedTransport;
    use serde_json::json;
    use std::time::Duration;

    fn client(
        transport: Arc<ScriptedTransport>,
    ) -> ResilientClient<ScriptedTransport, InMemoryDurableStore<TestClock>, TestClock> {
        let clock = Arc::new(TestClock::default());
        let durable = Arc::new(InMemoryDurableStore::new(Arc::clone(&clock)));
        let executor = HttpExecutor::new(transport, "https://api.example.com", "test-key");
        let breaker = CircuitBreaker::new(
            BreakerConfig::new("test", 5.0, Duration::from_millis(60_000)),
            Arc::clone(&clock),
        );
        let cache = ResponseCache::new(
            CacheConfig::new("test", 100, Duration::from_secs(600)),
            Arc::clone(&durable),
        );
        let ratelimit = RateLimitTracker::new(
            RateLimitConfig::new("test", Duration::from_secs(600)),
            durable,
            Arc::clone(&clock),
        );
        let config = ClientConfig {
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            request_timeout: Duration::from_secs(1),
            validation_timeout: Duration::from_secs(1),
            max_retries: 3,
        };
        ResilientClient::new(executor, breaker, cache, ratelimit, clock, config)
    }

    #[tokio::test]
    async fn happy_path_returns_json_and_records_success() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, json!({"id": 1}));
        let client = client(transport);

        let result = client
            .request("/x", HttpMethod::Get, &[], None)
            .await
            .unwrap();
        assert_eq!(result, Payload::Json(json!({"id": 1})));
        assert_eq!(client.breaker().state(), hevy_sync_breaker::CircuitState::Closed);
    }

    #[tokio::test]
    async fn cache_hit_short_circuits_after_breaker_trips() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, json!({"cached": true}));
        for _ in 0..5 {
            transport.push_status(500);
        }
        let client = client(transport.clone());

        let query = vec![("p".to_string(), "1".to_string())];
        let first = client.request("/x", HttpMethod::Get, &query, None).await.unwrap();
        assert_eq!(first, Payload::Json(json!({"cached": true})));

        for _ in 0..5 {
            let _ = client.request("/y", HttpMethod::Get, &[], None).await;
        }
        assert_eq!(client.breaker().state(), hevy_sync_breaker::CircuitState::Open);

        let count_before = transport.request_count();
        let second = client.request("/x", HttpMethod::Get, &query, None).await.unwrap();
        assert_eq!(second, Payload::Json(json!({"cached": true})));
        assert_eq!(transport.request_count(), count_before);
    }

    #[tokio::test]
    async fn retries_retryable_status_then_succeeds() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_status(503);
        transport.push_json(200, json!({"ok": true}));
        let client = client(transport.clone());

        let result = client.request("/x", HttpMethod::Get, &[], None).await.unwrap();
        assert_eq!(result, Payload::Json(json!({"ok": true})));
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn non_retryable_status_fails_immediately_and_records_failure() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_status(403);
        let client = client(transport.clone());

        let err = client.request("/x", HttpMethod::Get, &[], None).await.unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn exhausting_retries_surfaces_last_error() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_status(503);
        transport.push_status(503);
        transport.push_status(503);
        let client = client(transport.clone());

        let err = client.request("/x", HttpMethod::Get, &[], None).await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert_eq!(transport.request_count(), 3);
    }

    #[tokio::test]
    async fn circuit_open_is_never_retried_or_recorded() {
        let transport = Arc::new(ScriptedTransport::new());
        for _ in 0..5 {
            transport.push_status(500);
        }
        let client = client(transport.clone());

        for _ in 0..5 {
            let _ = client.request("/x", HttpMethod::Get, &[], None).await;
        }
        assert_eq!(client.breaker().state(), hevy_sync_breaker::CircuitState::Open);

        let count_before = transport.request_count();
        let err = client.request("/x", HttpMethod::Get, &[], None).await.unwrap_err();
        assert!(err.is_circuit_open());
        assert_eq!(transport.request_count(), count_before);
    }

    #[tokio::test]
    async fn validate_key_maps_401_to_invalid_api_key() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_status(401);
        let client = client(transport);

        let err = client.validate_key().await.unwrap_err();
        assert!(err.is_invalid_api_key());
    }

    #[tokio::test]
    async fn validate_key_rewrites_timeout_to_connection_check() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_error(hevy_sync_transport::TransportError::Timeout);
        let client = client(transport);

        let err = client.validate_key().await.unwrap_err();
        assert!(matches!(err, ClientError::ConnectionCheck));
    }

    #[tokio::test]
    async fn post_requests_never_consult_the_cache() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push_json(200, json!({"n": 1}));
        transport.push_json(200, json!({"n": 2}));
        let client = client(transport.clone());

        let first = client
            .request("/x", HttpMethod::Post, &[], Some(RequestBody::Json(json!({}))))
            .await
            .unwrap();
        let second = client
            .request("/x", HttpMethod::Post, &[], Some(RequestBody::Json(json!({}))))
            .await
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(transport.request_count(), 2);
    }
}

//! Retrying HTTP client
//!
//! [`HttpClient::request`] is the single entry point every resource goes
//! through. It layers the retry policy over [`HttpClient::execute`], which
//! performs exactly one attempt: build URL and headers, enforce the deadline
//! composed with caller cancellation, then parse or classify the outcome.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use crate::config::{RetryConfig, RetryOverride};
use crate::error::{classify, GorgiasError, RequestContext};
use crate::http::retry::with_retry;
use crate::http::transport::{HttpTransport, TransportRequest};
use crate::http::types::{Headers, HttpMethod, RequestOptions, RequestSpec, ResponseEnvelope};

/// Wiring for an [`HttpClient`]
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Absolute base URL; a trailing slash is added if missing
    pub base_url: String,

    /// Precomputed `Basic ...` authorization header value
    pub auth_header: String,

    /// Default per-attempt timeout
    pub timeout: Duration,

    /// Default retry policy
    pub retry: RetryConfig,

    /// Header name for outbound trace ID propagation
    pub trace_id_header: String,
}

/// Shared, immutable HTTP layer. Concurrent `request` calls are fully
/// independent; nothing here is mutated after construction.
pub struct HttpClient {
    transport: Arc<dyn HttpTransport>,
    base_url: Url,
    auth_header: String,
    timeout: Duration,
    retry: RetryConfig,
    trace_id_header: String,
}

impl HttpClient {
    pub fn new(
        config: HttpClientConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, GorgiasError> {
        // The trailing slash matters: Url::join treats the last segment of a
        // slashless base as a file and would drop it.
        let mut base = config.base_url;
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base).map_err(|e| {
            GorgiasError::validation("base_url", "format", format!("invalid base URL: {e}"))
        })?;

        Ok(Self {
            transport,
            base_url,
            auth_header: config.auth_header,
            timeout: config.timeout,
            retry: config.retry,
            trace_id_header: config.trace_id_header,
        })
    }

    /// Execute a request with the effective retry policy applied
    pub async fn request(
        &self,
        spec: &RequestSpec,
        options: &RequestOptions,
    ) -> Result<ResponseEnvelope, GorgiasError> {
        match options.retry.as_ref() {
            Some(RetryOverride::Disabled) => self.execute(spec, options).await,
            Some(RetryOverride::Patch(patch)) => {
                let config = self.retry.merged(patch);
                with_retry(&config, options.trace_id.as_deref(), || {
                    self.execute(spec, options)
                })
                .await
            }
            None => {
                with_retry(&self.retry, options.trace_id.as_deref(), || {
                    self.execute(spec, options)
                })
                .await
            }
        }
    }

    /// Execute a request and deserialize the response body
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        spec: &RequestSpec,
        options: &RequestOptions,
    ) -> Result<T, GorgiasError> {
        let envelope = self.request(spec, options).await?;
        let body = envelope.body.ok_or_else(|| {
            GorgiasError::network(
                "empty response body where content was expected",
                None,
                options.trace_id.as_deref(),
            )
        })?;
        serde_json::from_value(body).map_err(|e| {
            GorgiasError::network(
                format!("failed to decode response body: {e}"),
                None,
                options.trace_id.as_deref(),
            )
        })
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: Vec<(String, String)>,
        options: &RequestOptions,
    ) -> Result<T, GorgiasError> {
        let spec = RequestSpec::new(HttpMethod::Get, path).params(params);
        self.request_json(&spec, options).await
    }

    pub async fn post_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        options: &RequestOptions,
    ) -> Result<T, GorgiasError> {
        let spec = RequestSpec::new(HttpMethod::Post, path).json_body(body)?;
        self.request_json(&spec, options).await
    }

    pub async fn put_json<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        options: &RequestOptions,
    ) -> Result<T, GorgiasError> {
        let spec = RequestSpec::new(HttpMethod::Put, path).json_body(body)?;
        self.request_json(&spec, options).await
    }

    /// POST where the caller does not care about the response body
    pub async fn post_empty<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        options: &RequestOptions,
    ) -> Result<(), GorgiasError> {
        let spec = RequestSpec::new(HttpMethod::Post, path).json_body(body)?;
        self.request(&spec, options).await.map(|_| ())
    }

    /// PUT where the caller does not care about the response body
    pub async fn put_empty<B: Serialize>(
        &self,
        path: &str,
        body: &B,
        options: &RequestOptions,
    ) -> Result<(), GorgiasError> {
        let spec = RequestSpec::new(HttpMethod::Put, path).json_body(body)?;
        self.request(&spec, options).await.map(|_| ())
    }

    /// DELETE with an optional JSON body
    pub async fn delete<B: Serialize>(
        &self,
        path: &str,
        body: Option<&B>,
        options: &RequestOptions,
    ) -> Result<(), GorgiasError> {
        let mut spec = RequestSpec::new(HttpMethod::Delete, path);
        if let Some(body) = body {
            spec = spec.json_body(body)?;
        }
        self.request(&spec, options).await.map(|_| ())
    }

    /// One network attempt: no retries at this level.
    async fn execute(
        &self,
        spec: &RequestSpec,
        options: &RequestOptions,
    ) -> Result<ResponseEnvelope, GorgiasError> {
        let url = self.build_url(&spec.path, &spec.params)?;
        let timeout = options.timeout.unwrap_or(self.timeout);
        let trace_id = options.trace_id.as_deref();
        let context = RequestContext::new(spec.method.as_str(), spec.path.clone());

        // Defaults first, per-request overrides last so they win.
        let mut headers = Headers::new();
        headers.insert("content-type", "application/json");
        headers.insert("authorization", self.auth_header.clone());
        if let Some(trace_id) = trace_id {
            headers.insert(self.trace_id_header.as_str(), trace_id);
        }
        for (name, value) in spec.headers.iter() {
            headers.insert(name, value);
        }

        let body = match &spec.body {
            Some(value) => Some(serde_json::to_string(value).map_err(|e| {
                GorgiasError::network(
                    format!("failed to encode request body: {e}"),
                    None,
                    trace_id,
                )
            })?),
            None => None,
        };

        let request = TransportRequest {
            method: spec.method,
            url,
            headers,
            body,
        };

        tracing::debug!(
            method = spec.method.as_str(),
            path = spec.path.as_str(),
            trace_id = trace_id.unwrap_or_default(),
            "dispatching request"
        );

        // Whichever fires first wins: caller cancellation, the deadline, or
        // the attempt itself. select drops the losing futures, so nothing
        // stays registered past this call.
        let attempt = self.transport.execute(request);
        let outcome = match &options.cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => {
                        return Err(GorgiasError::network("request cancelled", None, trace_id));
                    }
                    outcome = tokio::time::timeout(timeout, attempt) => outcome,
                }
            }
            None => tokio::time::timeout(timeout, attempt).await,
        };

        let response = match outcome {
            Err(_elapsed) => return Err(GorgiasError::timeout(timeout, trace_id)),
            Ok(Err(transport_error)) => {
                return Err(GorgiasError::network(
                    transport_error.message().to_string(),
                    transport_error.cause(),
                    trace_id,
                ));
            }
            Ok(Ok(response)) => response,
        };

        if !(200..300).contains(&response.status) {
            // Best effort: an unparsable error body classifies as absent.
            let body = serde_json::from_str::<serde_json::Value>(&response.body).ok();
            return Err(classify(
                response.status,
                body.as_ref(),
                context,
                &response.headers,
                trace_id,
            ));
        }

        if response.status == 204 || response.body.is_empty() {
            return Ok(ResponseEnvelope {
                status: response.status,
                body: None,
                headers: response.headers,
            });
        }

        let body = serde_json::from_str(&response.body).map_err(|e| {
            GorgiasError::network(format!("failed to decode response body: {e}"), None, trace_id)
        })?;

        Ok(ResponseEnvelope {
            status: response.status,
            body: Some(body),
            headers: response.headers,
        })
    }

    /// Join the request path onto the base URL, relative-safe: a leading
    /// slash must not discard the base path's own segments.
    fn build_url(&self, path: &str, params: &[(String, String)]) -> Result<Url, GorgiasError> {
        let relative = path.trim_start_matches('/');
        let mut url = self.base_url.join(relative).map_err(|e| {
            GorgiasError::validation("path", "format", format!("invalid request path: {e}"))
        })?;

        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RetryPatch;
    use crate::http::transport::{TransportError, TransportResponse};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio_util::sync::CancellationToken;

    /// Scripted transport double: pops one canned outcome per attempt and
    /// records every request it sees.
    #[derive(Default)]
    struct ScriptedTransport {
        outcomes: Mutex<VecDeque<Result<TransportResponse, TransportError>>>,
        seen: Mutex<Vec<TransportRequest>>,
    }

    impl ScriptedTransport {
        fn respond_with(outcomes: Vec<Result<TransportResponse, TransportError>>) -> Arc<Self> {
            Arc::new(Self {
                outcomes: Mutex::new(outcomes.into()),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn requests(&self) -> Vec<TransportRequest> {
            self.seen.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn execute(
            &self,
            request: TransportRequest,
        ) -> Result<TransportResponse, TransportError> {
            self.seen.lock().unwrap().push(request);
            self.outcomes
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(TransportError::new("script exhausted")))
        }
    }

    /// Transport whose attempt never completes; used for timeout tests.
    struct StalledTransport;

    #[async_trait]
    impl HttpTransport for StalledTransport {
        async fn execute(
            &self,
            _request: TransportRequest,
        ) -> Result<TransportResponse, TransportError> {
            futures::future::pending().await
        }
    }

    fn ok_response(body: &str) -> Result<TransportResponse, TransportError> {
        Ok(TransportResponse {
            status: 200,
            headers: Headers::new(),
            body: body.to_string(),
        })
    }

    fn status_response(status: u16, body: &str) -> Result<TransportResponse, TransportError> {
        Ok(TransportResponse {
            status,
            headers: Headers::new(),
            body: body.to_string(),
        })
    }

    fn client(transport: Arc<dyn HttpTransport>) -> HttpClient {
        HttpClient::new(
            HttpClientConfig {
                base_url: "https://acme.gorgias.com/api".to_string(),
                auth_header: "Basic dXNlcjprZXk=".to_string(),
                timeout: Duration::from_secs(30),
                retry: RetryConfig::default(),
                trace_id_header: "x-trace-id".to_string(),
            },
            transport,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn leading_slash_does_not_escape_base_path() {
        let transport = ScriptedTransport::respond_with(vec![ok_response("{}"), ok_response("{}")]);
        let client = client(transport.clone());
        let options = RequestOptions::default();

        let with_slash = RequestSpec::new(HttpMethod::Get, "/tickets");
        let without_slash = RequestSpec::new(HttpMethod::Get, "tickets");
        client.request(&with_slash, &options).await.unwrap();
        client.request(&without_slash, &options).await.unwrap();

        let seen = transport.requests();
        assert_eq!(seen[0].url.as_str(), "https://acme.gorgias.com/api/tickets");
        assert_eq!(seen[0].url.as_str(), seen[1].url.as_str());
    }

    #[tokio::test]
    async fn query_params_are_appended() {
        let transport = ScriptedTransport::respond_with(vec![ok_response("{}")]);
        let client = client(transport.clone());
        let spec = RequestSpec::new(HttpMethod::Get, "/tickets")
            .param("limit", Some(50))
            .param("cursor", None::<String>)
            .param("status", Some("open"));
        client
            .request(&spec, &RequestOptions::default())
            .await
            .unwrap();

        let url = transport.requests()[0].url.clone();
        assert_eq!(url.query(), Some("limit=50&status=open"));
    }

    #[tokio::test]
    async fn default_headers_are_set_and_overrides_win() {
        let transport = ScriptedTransport::respond_with(vec![ok_response("{}")]);
        let client = client(transport.clone());
        let spec = RequestSpec::new(HttpMethod::Get, "/tickets").header("Content-Type", "text/plain");
        let options = RequestOptions {
            trace_id: Some("trace-9".to_string()),
            ..Default::default()
        };
        client.request(&spec, &options).await.unwrap();

        let headers = transport.requests()[0].headers.clone();
        assert_eq!(headers.get("authorization"), Some("Basic dXNlcjprZXk="));
        assert_eq!(headers.get("x-trace-id"), Some("trace-9"));
        // The per-request override beats the default content type.
        assert_eq!(headers.get("content-type"), Some("text/plain"));
    }

    #[tokio::test]
    async fn status_204_yields_absent_body() {
        let transport = ScriptedTransport::respond_with(vec![status_response(204, "")]);
        let client = client(transport);
        let spec = RequestSpec::new(HttpMethod::Delete, "/tickets/1");
        let envelope = client
            .request(&spec, &RequestOptions::default())
            .await
            .unwrap();
        assert_eq!(envelope.status, 204);
        assert!(envelope.body.is_none());
    }

    #[tokio::test]
    async fn empty_200_body_yields_absent_body() {
        let transport = ScriptedTransport::respond_with(vec![status_response(200, "")]);
        let client = client(transport);
        let spec = RequestSpec::new(HttpMethod::Get, "/tickets/1");
        let envelope = client
            .request(&spec, &RequestOptions::default())
            .await
            .unwrap();
        assert!(envelope.body.is_none());
    }

    #[tokio::test]
    async fn non_2xx_is_classified() {
        let transport =
            ScriptedTransport::respond_with(vec![status_response(404, r#"{"error":"not here"}"#)]);
        let client = client(transport);
        let spec = RequestSpec::new(HttpMethod::Get, "/tickets/1");
        let error = client
            .request(&spec, &RequestOptions::default())
            .await
            .unwrap_err();
        assert_eq!(error.code(), "NOT_FOUND");
        assert_eq!(error.to_string(), "not here");
    }

    #[tokio::test]
    async fn unparsable_error_body_still_classifies() {
        let transport =
            ScriptedTransport::respond_with(vec![status_response(500, "<html>oops</html>")]);
        let client = client(transport);
        let spec = RequestSpec::new(HttpMethod::Get, "/tickets");
        let error = client
            .request(&spec, &RequestOptions {
                retry: Some(RetryOverride::Disabled),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(error.code(), "API_ERROR");
        assert_eq!(error.to_string(), "HTTP 500 error");
    }

    #[tokio::test(start_paused = true)]
    async fn retries_retryable_statuses_then_succeeds() {
        let transport = ScriptedTransport::respond_with(vec![
            status_response(503, ""),
            status_response(503, ""),
            ok_response(r#"{"id": 1}"#),
        ]);
        let client = client(transport.clone());
        let spec = RequestSpec::new(HttpMethod::Get, "/tickets/1");
        let envelope = client
            .request(&spec, &RequestOptions::default())
            .await
            .unwrap();
        assert_eq!(envelope.status, 200);
        assert_eq!(transport.requests().len(), 3);
    }

    #[tokio::test]
    async fn retry_disabled_makes_a_single_attempt() {
        let transport = ScriptedTransport::respond_with(vec![status_response(503, "")]);
        let client = client(transport.clone());
        let spec = RequestSpec::new(HttpMethod::Get, "/tickets");
        let options = RequestOptions {
            retry: Some(RetryOverride::Disabled),
            ..Default::default()
        };
        let error = client.request(&spec, &options).await.unwrap_err();
        assert_eq!(error.status(), Some(503));
        assert_eq!(transport.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn retry_patch_merges_over_defaults() {
        let transport = ScriptedTransport::respond_with(vec![
            status_response(503, ""),
            status_response(503, ""),
            status_response(503, ""),
            status_response(503, ""),
            ok_response("{}"),
        ]);
        let client = client(transport.clone());
        let spec = RequestSpec::new(HttpMethod::Get, "/tickets");
        let options = RequestOptions {
            retry: Some(RetryOverride::Patch(RetryPatch {
                max_attempts: Some(5),
                ..Default::default()
            })),
            ..Default::default()
        };
        client.request(&spec, &options).await.unwrap();
        assert_eq!(transport.requests().len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_produces_timeout_error() {
        let client = client(Arc::new(StalledTransport));
        let spec = RequestSpec::new(HttpMethod::Get, "/tickets");
        let options = RequestOptions {
            timeout: Some(Duration::from_millis(250)),
            retry: Some(RetryOverride::Disabled),
            ..Default::default()
        };
        let error = client.request(&spec, &options).await.unwrap_err();
        assert_eq!(error.code(), "TIMEOUT");
        match error {
            GorgiasError::Timeout { timeout, .. } => {
                assert_eq!(timeout, Duration::from_millis(250));
            }
            other => panic!("expected Timeout, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn caller_cancellation_produces_network_error() {
        let client = client(Arc::new(StalledTransport));
        let token = CancellationToken::new();
        let spec = RequestSpec::new(HttpMethod::Get, "/tickets");
        let options = RequestOptions {
            cancel: Some(token.clone()),
            retry: Some(RetryOverride::Disabled),
            ..Default::default()
        };

        let request = client.request(&spec, &options);
        tokio::pin!(request);

        // Let the attempt start, then cancel from the caller's side.
        tokio::select! {
            _ = &mut request => panic!("request should still be pending"),
            _ = tokio::time::sleep(Duration::from_millis(10)) => {}
        }
        token.cancel();

        let error = request.await.unwrap_err();
        assert_eq!(error.code(), "NETWORK_ERROR");
        assert_eq!(error.to_string(), "network error: request cancelled");
    }

    #[tokio::test(start_paused = true)]
    async fn pre_cancelled_token_aborts_before_timeout() {
        let client = client(Arc::new(StalledTransport));
        let token = CancellationToken::new();
        token.cancel();
        let spec = RequestSpec::new(HttpMethod::Get, "/tickets");
        let options = RequestOptions {
            cancel: Some(token),
            retry: Some(RetryOverride::Disabled),
            ..Default::default()
        };
        let error = client.request(&spec, &options).await.unwrap_err();
        assert_eq!(error.code(), "NETWORK_ERROR");
    }

    #[tokio::test(start_paused = true)]
    async fn transport_failures_wrap_as_network_errors_and_retry() {
        let transport = ScriptedTransport::respond_with(vec![
            Err(TransportError::new("connection failed")),
            ok_response("{}"),
        ]);
        let client = client(transport.clone());
        let spec = RequestSpec::new(HttpMethod::Get, "/tickets");
        client
            .request(&spec, &RequestOptions::default())
            .await
            .unwrap();
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn request_json_decodes_typed_body() {
        #[derive(serde::Deserialize)]
        struct Item {
            id: u64,
        }
        let transport = ScriptedTransport::respond_with(vec![ok_response(r#"{"id": 7}"#)]);
        let client = client(transport);
        let spec = RequestSpec::new(HttpMethod::Get, "/tickets/7");
        let item: Item = client
            .request_json(&spec, &RequestOptions::default())
            .await
            .unwrap();
        assert_eq!(item.id, 7);
    }

    #[tokio::test]
    async fn body_is_serialized_to_the_wire() {
        let transport = ScriptedTransport::respond_with(vec![ok_response(r#"{"id": 1}"#)]);
        let client = client(transport.clone());
        let spec = RequestSpec::new(HttpMethod::Post, "/tickets")
            .json_body(&serde_json::json!({"subject": "help"}))
            .unwrap();
        client
            .request(&spec, &RequestOptions::default())
            .await
            .unwrap();
        let body = transport.requests()[0].body.clone().unwrap();
        assert_eq!(body, r#"{"subject":"help"}"#);
    }
}

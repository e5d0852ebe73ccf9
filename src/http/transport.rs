//! Injectable HTTP transport boundary
//!
//! [`HttpTransport`] is the only external collaborator the client needs:
//! anything that can turn a [`TransportRequest`] into a [`TransportResponse`]
//! (the bundled reqwest implementation, or a scripted double in tests) is
//! interchangeable. The transport performs exactly one round trip and knows
//! nothing about retries, timeouts or error classification.

use async_trait::async_trait;
use thiserror::Error;
use url::Url;

use crate::http::types::{Headers, HttpMethod};

/// Failure below the HTTP layer: connection refused, DNS, TLS, aborted read.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Display of the underlying cause, if one was recorded
    pub fn cause(&self) -> Option<String> {
        self.source.as_ref().map(|s| s.to_string())
    }
}

/// Fully built request handed to the transport: absolute URL, merged
/// headers, encoded body.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Headers,
    pub body: Option<String>,
}

/// Raw response as received off the wire
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub headers: Headers,
    pub body: String,
}

/// One HTTP round trip. Network failures surface as [`TransportError`];
/// non-2xx statuses are not errors at this layer.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn execute(&self, request: TransportRequest)
        -> Result<TransportResponse, TransportError>;
}

/// Production transport backed by a shared reqwest client.
///
/// Built without a client-level timeout: deadlines are enforced one layer up
/// so they compose with per-request overrides and cancellation.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Patch => reqwest::Method::PATCH,
        };

        let mut builder = self.client.request(method, request.url);
        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            let message = if e.is_connect() {
                "connection failed"
            } else if e.is_request() {
                "request dispatch failed"
            } else {
                "network error"
            };
            TransportError::with_source(message, e)
        })?;

        let status = response.status().as_u16();
        let mut headers = Headers::new();
        for (name, value) in response.headers() {
            if let Ok(value) = value.to_str() {
                headers.insert(name.as_str(), value);
            }
        }

        let body = response
            .text()
            .await
            .map_err(|e| TransportError::with_source("failed to read response body", e))?;

        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

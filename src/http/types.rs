//! Plain-data HTTP types shared across the transport boundary

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::config::RetryOverride;
use crate::error::GorgiasError;

/// HTTP method for a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Header collection with case-insensitive lookup
#[derive(Debug, Clone, Default)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header, replacing any existing value for the same name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(&name))
        {
            entry.1 = value;
        } else {
            self.entries.push((name, value));
        }
    }

    /// Case-insensitive lookup
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

/// One HTTP request described as data, immutable once built.
///
/// The path is relative to the client's base URL; a leading slash is
/// tolerated and does not escape the base path.
#[derive(Debug, Clone)]
pub struct RequestSpec {
    pub method: HttpMethod,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
    pub headers: Headers,
}

impl RequestSpec {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: Vec::new(),
            body: None,
            headers: Headers::new(),
        }
    }

    /// Append a query parameter. Absent values are omitted entirely.
    pub fn param(mut self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        if let Some(value) = value {
            self.params.push((key.into(), value.to_string()));
        }
        self
    }

    pub fn params(mut self, params: Vec<(String, String)>) -> Self {
        self.params.extend(params);
        self
    }

    /// Attach a JSON body
    pub fn json_body<T: Serialize>(mut self, body: &T) -> Result<Self, GorgiasError> {
        let value = serde_json::to_value(body).map_err(|e| {
            GorgiasError::validation("body", "serialize", format!("failed to serialize body: {e}"))
        })?;
        self.body = Some(value);
        Ok(self)
    }

    /// Set a per-request header override; takes precedence over defaults
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// Parsed response from one successful request
#[derive(Debug, Clone)]
pub struct ResponseEnvelope {
    pub status: u16,
    /// Parsed JSON body; `None` for 204 or zero-length responses
    pub body: Option<serde_json::Value>,
    pub headers: Headers,
}

/// Per-request knobs, all optional
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Override the client's default timeout for this request
    pub timeout: Option<Duration>,

    /// Cancellation token; aborts the in-flight attempt when triggered
    pub cancel: Option<CancellationToken>,

    /// Override or disable retrying for this request
    pub retry: Option<RetryOverride>,

    /// Trace ID propagated via the configured header and echoed into errors
    pub trace_id: Option<String>,
}

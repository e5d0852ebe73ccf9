//! Configuration types for the Gorgias client

use std::time::Duration;

/// Default request timeout (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default header used to propagate trace IDs to the API
pub const DEFAULT_TRACE_ID_HEADER: &str = "x-trace-id";

/// Top-level client configuration
#[derive(Debug, Clone)]
pub struct GorgiasConfig {
    /// Gorgias account subdomain (e.g. "mycompany" for mycompany.gorgias.com)
    pub subdomain: String,

    /// Email address used for HTTP Basic authentication
    pub email: String,

    /// API key from Settings > REST API in Gorgias
    pub api_key: String,

    /// Retry behaviour for transient failures
    pub retry: RetryConfig,

    /// Default per-request timeout
    pub timeout: Duration,

    /// Header name for outbound trace ID propagation
    pub trace_id_header: String,

    /// Override the API base URL (useful for testing against a local server)
    pub base_url: Option<String>,
}

impl GorgiasConfig {
    /// Create a config with required credentials and default everything else
    pub fn new(
        subdomain: impl Into<String>,
        email: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            subdomain: subdomain.into(),
            email: email.into(),
            api_key: api_key.into(),
            retry: RetryConfig::default(),
            timeout: DEFAULT_TIMEOUT,
            trace_id_header: DEFAULT_TRACE_ID_HEADER.to_string(),
            base_url: None,
        }
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one. Must be >= 1.
    pub max_attempts: u32,

    /// Base delay for exponential backoff
    pub base_delay: Duration,

    /// Upper bound on any computed delay, server hints included
    pub max_delay: Duration,

    /// HTTP status codes that trigger a retry
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
            max_delay: Duration::from_millis(30_000),
            retryable_statuses: vec![429, 502, 503, 504],
        }
    }
}

impl RetryConfig {
    /// Apply a partial override on top of this config
    pub fn merged(&self, patch: &RetryPatch) -> RetryConfig {
        RetryConfig {
            max_attempts: patch.max_attempts.unwrap_or(self.max_attempts),
            base_delay: patch.base_delay.unwrap_or(self.base_delay),
            max_delay: patch.max_delay.unwrap_or(self.max_delay),
            retryable_statuses: patch
                .retryable_statuses
                .clone()
                .unwrap_or_else(|| self.retryable_statuses.clone()),
        }
    }
}

/// Partial retry override. Unset fields fall back to the client defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryPatch {
    pub max_attempts: Option<u32>,
    pub base_delay: Option<Duration>,
    pub max_delay: Option<Duration>,
    pub retryable_statuses: Option<Vec<u16>>,
}

/// Per-request retry behaviour
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryOverride {
    /// Single attempt, errors propagate directly without the retry loop
    Disabled,

    /// Merge these fields over the client's retry defaults
    Patch(RetryPatch),
}

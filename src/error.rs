//! Error types for the Gorgias client
//!
//! All failures surface as one closed [`GorgiasError`] enum so callers can
//! match exhaustively on the kind. API responses are classified by HTTP
//! status in [`classify`]; client-side input problems use the `Validation`
//! variant and never reach the network.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::http::types::Headers;

/// Method and path of the request that failed. Carries no sensitive data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    pub method: String,
    pub path: String,
}

impl RequestContext {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
        }
    }
}

/// Diagnostic context attached to every API-side error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Gorgias-specific error code from the response body, if provided
    pub error_code: Option<String>,

    /// `x-request-id` response header for support correlation
    pub request_id: Option<String>,

    /// Caller-supplied trace ID, if any
    pub trace_id: Option<String>,

    /// The request that produced this error
    pub request: RequestContext,

    /// When the error was constructed
    pub timestamp: DateTime<Utc>,
}

/// One field-level failure from a 422 response
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// All errors produced by this crate
#[derive(Debug, Clone, Error)]
pub enum GorgiasError {
    /// Unclassified non-2xx response
    #[error("{message}")]
    Api {
        message: String,
        status: u16,
        context: ErrorContext,
    },

    /// 401 or 403 response
    #[error("{message}")]
    Authentication {
        message: String,
        status: u16,
        context: ErrorContext,
    },

    /// 404 response
    #[error("{message}")]
    NotFound {
        message: String,
        context: ErrorContext,
    },

    /// 429 response, optionally carrying the server's Retry-After hint
    #[error("{message}")]
    RateLimited {
        message: String,
        retry_after: Option<Duration>,
        context: ErrorContext,
    },

    /// 422 response with optional field-level detail
    #[error("{message}")]
    ApiValidation {
        message: String,
        field_errors: Option<Vec<FieldError>>,
        context: ErrorContext,
    },

    /// Client-side input validation failure, raised before any network call
    #[error("{message}")]
    Validation {
        field: String,
        constraint: String,
        message: String,
        timestamp: DateTime<Utc>,
    },

    /// Connection failure, DNS error or caller-initiated cancellation
    #[error("network error: {message}")]
    Network {
        message: String,
        cause: Option<String>,
        trace_id: Option<String>,
        timestamp: DateTime<Utc>,
    },

    /// The attempt exceeded its deadline
    #[error("request timed out after {}ms", timeout.as_millis())]
    Timeout {
        timeout: Duration,
        trace_id: Option<String>,
        timestamp: DateTime<Utc>,
    },
}

impl GorgiasError {
    /// Machine-checkable code for this error kind
    pub fn code(&self) -> &'static str {
        match self {
            GorgiasError::Api { .. } => "API_ERROR",
            GorgiasError::Authentication { .. } => "AUTHENTICATION_FAILED",
            GorgiasError::NotFound { .. } => "NOT_FOUND",
            GorgiasError::RateLimited { .. } => "RATE_LIMITED",
            GorgiasError::ApiValidation { .. } => "API_VALIDATION_ERROR",
            GorgiasError::Validation { .. } => "VALIDATION_ERROR",
            GorgiasError::Network { .. } => "NETWORK_ERROR",
            GorgiasError::Timeout { .. } => "TIMEOUT",
        }
    }

    /// HTTP status, for the kinds that carry one
    pub fn status(&self) -> Option<u16> {
        match self {
            GorgiasError::Api { status, .. } => Some(*status),
            GorgiasError::Authentication { status, .. } => Some(*status),
            GorgiasError::NotFound { .. } => Some(404),
            GorgiasError::RateLimited { .. } => Some(429),
            GorgiasError::ApiValidation { .. } => Some(422),
            _ => None,
        }
    }

    /// Trace ID carried by this error, if any
    pub fn trace_id(&self) -> Option<&str> {
        match self {
            GorgiasError::Api { context, .. }
            | GorgiasError::Authentication { context, .. }
            | GorgiasError::NotFound { context, .. }
            | GorgiasError::RateLimited { context, .. }
            | GorgiasError::ApiValidation { context, .. } => context.trace_id.as_deref(),
            GorgiasError::Network { trace_id, .. } | GorgiasError::Timeout { trace_id, .. } => {
                trace_id.as_deref()
            }
            GorgiasError::Validation { .. } => None,
        }
    }

    /// When the error was constructed
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            GorgiasError::Api { context, .. }
            | GorgiasError::Authentication { context, .. }
            | GorgiasError::NotFound { context, .. }
            | GorgiasError::RateLimited { context, .. }
            | GorgiasError::ApiValidation { context, .. } => context.timestamp,
            GorgiasError::Validation { timestamp, .. }
            | GorgiasError::Network { timestamp, .. }
            | GorgiasError::Timeout { timestamp, .. } => *timestamp,
        }
    }

    pub(crate) fn validation(
        field: impl Into<String>,
        constraint: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        GorgiasError::Validation {
            field: field.into(),
            constraint: constraint.into(),
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub(crate) fn network(
        message: impl Into<String>,
        cause: Option<String>,
        trace_id: Option<&str>,
    ) -> Self {
        GorgiasError::Network {
            message: message.into(),
            cause,
            trace_id: trace_id.map(str::to_string),
            timestamp: Utc::now(),
        }
    }

    pub(crate) fn timeout(timeout: Duration, trace_id: Option<&str>) -> Self {
        GorgiasError::Timeout {
            timeout,
            trace_id: trace_id.map(str::to_string),
            timestamp: Utc::now(),
        }
    }
}

/// Pull a human-readable message out of a heterogeneous error body value.
///
/// Gorgias error payloads are not uniform: `error` may be a plain string, an
/// object with `message` or `detail`, or something else entirely. Rules, in
/// order: non-empty strings pass through; null yields nothing; objects prefer
/// a non-empty `message` then a non-empty `detail` string, otherwise (arrays
/// included) the exact JSON serialization is used; scalars yield nothing.
pub fn extract_error_message(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::String(_) => None,
        Value::Null => None,
        Value::Object(map) => {
            if let Some(Value::String(message)) = map.get("message") {
                if !message.is_empty() {
                    return Some(message.clone());
                }
            }
            if let Some(Value::String(detail)) = map.get("detail") {
                if !detail.is_empty() {
                    return Some(detail.clone());
                }
            }
            serde_json::to_string(value).ok()
        }
        Value::Array(_) => serde_json::to_string(value).ok(),
        _ => None,
    }
}

/// Classify a completed HTTP exchange into the appropriate error kind.
///
/// The message is resolved from the body's `error` field, then `message`,
/// then a literal `HTTP {status} error`. Classification is deterministic:
/// the same inputs always produce the same kind and fields.
pub fn classify(
    status: u16,
    body: Option<&Value>,
    request: RequestContext,
    headers: &Headers,
    trace_id: Option<&str>,
) -> GorgiasError {
    let message = body
        .and_then(|b| b.get("error"))
        .and_then(extract_error_message)
        .or_else(|| {
            body.and_then(|b| b.get("message"))
                .and_then(extract_error_message)
        })
        .unwrap_or_else(|| format!("HTTP {status} error"));

    let error_code = body
        .and_then(|b| b.get("error_code"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let context = ErrorContext {
        error_code,
        request_id: headers.get("x-request-id").map(str::to_string),
        trace_id: trace_id.map(str::to_string),
        request,
        timestamp: Utc::now(),
    };

    match status {
        401 | 403 => GorgiasError::Authentication {
            message,
            status,
            context,
        },
        404 => GorgiasError::NotFound { message, context },
        429 => {
            // An absent or unparsable Retry-After header leaves the hint
            // unset; classification itself never fails.
            let retry_after = headers
                .get("retry-after")
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs);
            GorgiasError::RateLimited {
                message,
                retry_after,
                context,
            }
        }
        422 => {
            let field_errors = body
                .and_then(|b| b.get("errors"))
                .and_then(|v| serde_json::from_value::<Vec<FieldError>>(v.clone()).ok());
            GorgiasError::ApiValidation {
                message,
                field_errors,
                context,
            }
        }
        _ => GorgiasError::Api {
            message,
            status,
            context,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ctx() -> RequestContext {
        RequestContext::new("GET", "/tickets")
    }

    #[test]
    fn extract_returns_strings_unchanged() {
        assert_eq!(
            extract_error_message(&json!("Something went wrong")),
            Some("Something went wrong".to_string())
        );
    }

    #[test]
    fn extract_ignores_empty_strings() {
        assert_eq!(extract_error_message(&json!("")), None);
    }

    #[test]
    fn extract_ignores_null() {
        assert_eq!(extract_error_message(&Value::Null), None);
    }

    #[test]
    fn extract_prefers_message_over_detail() {
        assert_eq!(
            extract_error_message(&json!({"message": "Message", "detail": "Detail"})),
            Some("Message".to_string())
        );
    }

    #[test]
    fn extract_falls_back_to_detail() {
        assert_eq!(
            extract_error_message(&json!({"detail": "Error detail"})),
            Some("Error detail".to_string())
        );
    }

    #[test]
    fn extract_serializes_objects_without_message_or_detail() {
        assert_eq!(
            extract_error_message(&json!({"code": "ERR_001"})),
            Some(r#"{"code":"ERR_001"}"#.to_string())
        );
    }

    #[test]
    fn extract_serializes_arrays() {
        assert_eq!(
            extract_error_message(&json!(["error1", "error2"])),
            Some(r#"["error1","error2"]"#.to_string())
        );
    }

    #[test]
    fn extract_serializes_empty_objects() {
        assert_eq!(extract_error_message(&json!({})), Some("{}".to_string()));
    }

    #[test]
    fn extract_ignores_empty_message_property() {
        assert_eq!(
            extract_error_message(&json!({"message": ""})),
            Some(r#"{"message":""}"#.to_string())
        );
    }

    #[test]
    fn extract_ignores_scalars() {
        assert_eq!(extract_error_message(&json!(42)), None);
        assert_eq!(extract_error_message(&json!(true)), None);
    }

    #[test]
    fn classify_resolves_message_from_error_field() {
        let body = json!({"error": "Internal server error"});
        let err = classify(500, Some(&body), ctx(), &Headers::new(), None);
        assert_eq!(err.to_string(), "Internal server error");
        assert_eq!(err.status(), Some(500));
        assert_eq!(err.code(), "API_ERROR");
    }

    #[test]
    fn classify_resolves_nested_error_detail() {
        let body = json!({"error": {"detail": "Rate limit exceeded"}});
        let err = classify(429, Some(&body), ctx(), &Headers::new(), None);
        assert_eq!(err.to_string(), "Rate limit exceeded");
    }

    #[test]
    fn classify_falls_back_to_message_field() {
        let body = json!({"message": "Bad request"});
        let err = classify(400, Some(&body), ctx(), &Headers::new(), None);
        assert_eq!(err.to_string(), "Bad request");
    }

    #[test]
    fn classify_empty_body_uses_status_literal() {
        let body = json!({});
        let err = classify(500, Some(&body), ctx(), &Headers::new(), None);
        assert_eq!(err.to_string(), "HTTP 500 error");
    }

    #[test]
    fn classify_absent_body_uses_status_literal() {
        let err = classify(502, None, ctx(), &Headers::new(), None);
        assert_eq!(err.to_string(), "HTTP 502 error");
    }

    #[test]
    fn classify_401_and_403_as_authentication() {
        for status in [401, 403] {
            let err = classify(status, None, ctx(), &Headers::new(), None);
            assert_eq!(err.code(), "AUTHENTICATION_FAILED");
            assert_eq!(err.status(), Some(status));
        }
    }

    #[test]
    fn classify_404_forces_status() {
        let err = classify(404, None, ctx(), &Headers::new(), None);
        assert_eq!(err.code(), "NOT_FOUND");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn classify_429_parses_retry_after_seconds() {
        let mut headers = Headers::new();
        headers.insert("Retry-After", "30");
        let body = json!({"message": "Too many requests"});
        let err = classify(429, Some(&body), ctx(), &headers, None);
        match err {
            GorgiasError::RateLimited { retry_after, .. } => {
                assert_eq!(retry_after, Some(Duration::from_secs(30)));
            }
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn classify_429_tolerates_unparsable_retry_after() {
        let mut headers = Headers::new();
        headers.insert("retry-after", "invalid");
        let err = classify(429, None, ctx(), &headers, None);
        match err {
            GorgiasError::RateLimited { retry_after, .. } => assert_eq!(retry_after, None),
            other => panic!("expected RateLimited, got {other:?}"),
        }
    }

    #[test]
    fn classify_422_collects_field_errors() {
        let body = json!({
            "message": "Validation failed",
            "errors": [{"field": "email", "message": "invalid email"}]
        });
        let err = classify(422, Some(&body), ctx(), &Headers::new(), None);
        match err {
            GorgiasError::ApiValidation { field_errors, .. } => {
                let errors = field_errors.expect("field errors present");
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].field, "email");
                assert_eq!(errors[0].message, "invalid email");
            }
            other => panic!("expected ApiValidation, got {other:?}"),
        }
    }

    #[test]
    fn classify_captures_error_code_request_id_and_trace_id() {
        let mut headers = Headers::new();
        headers.insert("x-request-id", "req-123");
        let body = json!({"error": "nope", "error_code": "E42"});
        let err = classify(500, Some(&body), ctx(), &headers, Some("trace-1"));
        match err {
            GorgiasError::Api { context, .. } => {
                assert_eq!(context.error_code.as_deref(), Some("E42"));
                assert_eq!(context.request_id.as_deref(), Some("req-123"));
                assert_eq!(context.trace_id.as_deref(), Some("trace-1"));
                assert_eq!(context.request, ctx());
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }

    #[test]
    fn classify_is_deterministic_excluding_timestamp() {
        let mut headers = Headers::new();
        headers.insert("retry-after", "5");
        let body = json!({"error": "slow down"});
        let a = classify(429, Some(&body), ctx(), &headers, Some("t"));
        let b = classify(429, Some(&body), ctx(), &headers, Some("t"));
        assert_eq!(a.code(), b.code());
        assert_eq!(a.status(), b.status());
        assert_eq!(a.to_string(), b.to_string());
        match (a, b) {
            (
                GorgiasError::RateLimited {
                    retry_after: ra,
                    context: ca,
                    ..
                },
                GorgiasError::RateLimited {
                    retry_after: rb,
                    context: cb,
                    ..
                },
            ) => {
                assert_eq!(ra, rb);
                assert_eq!(ca.error_code, cb.error_code);
                assert_eq!(ca.request_id, cb.request_id);
                assert_eq!(ca.trace_id, cb.trace_id);
                assert_eq!(ca.request, cb.request);
            }
            _ => panic!("expected two RateLimited errors"),
        }
    }

    #[test]
    fn validation_error_carries_field_and_constraint() {
        let err = GorgiasError::validation("ticketId", "positive", "ticketId must be positive");
        assert_eq!(err.code(), "VALIDATION_ERROR");
        assert_eq!(err.status(), None);
        match err {
            GorgiasError::Validation {
                field, constraint, ..
            } => {
                assert_eq!(field, "ticketId");
                assert_eq!(constraint, "positive");
            }
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn timeout_error_carries_duration_in_message() {
        let err = GorgiasError::timeout(Duration::from_millis(1500), None);
        assert_eq!(err.to_string(), "request timed out after 1500ms");
        assert_eq!(err.code(), "TIMEOUT");
    }
}

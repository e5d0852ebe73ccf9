//! Client-side input validation
//!
//! These checks run before any network I/O. Failures are
//! [`GorgiasError::Validation`] and are never retried or wrapped.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::GorgiasError;

/// 1-63 characters, alphanumeric at both ends, hyphens allowed in the
/// middle, case-insensitive.
static SUBDOMAIN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^[a-z0-9]([a-z0-9-]{0,61}[a-z0-9])?$").expect("valid regex"));

/// Validate a Gorgias account subdomain
pub fn validate_subdomain(subdomain: &str) -> Result<(), GorgiasError> {
    let trimmed = subdomain.trim();
    if trimmed.is_empty() {
        return Err(GorgiasError::validation(
            "subdomain",
            "required",
            "subdomain cannot be empty",
        ));
    }
    if !SUBDOMAIN_PATTERN.is_match(trimmed) {
        return Err(GorgiasError::validation(
            "subdomain",
            "format",
            "subdomain must be alphanumeric with optional hyphens (not at start/end), 1-63 characters",
        ));
    }
    Ok(())
}

/// Validate a resource ID. Gorgias IDs are positive integers.
pub fn validate_id(id: u64, field: &str) -> Result<(), GorgiasError> {
    if id == 0 {
        return Err(GorgiasError::validation(
            field,
            "positive",
            format!("{field} must be a positive integer, got {id}"),
        ));
    }
    Ok(())
}

/// Validate that a string field is non-empty after trimming
pub fn validate_non_empty_str(value: &str, field: &str) -> Result<(), GorgiasError> {
    if value.trim().is_empty() {
        return Err(GorgiasError::validation(
            field,
            "nonEmpty",
            format!("{field} cannot be empty"),
        ));
    }
    Ok(())
}

/// Validate that a slice field has at least one element
pub fn validate_non_empty_slice<T>(values: &[T], field: &str) -> Result<(), GorgiasError> {
    if values.is_empty() {
        return Err(GorgiasError::validation(
            field,
            "nonEmpty",
            format!("{field} cannot be empty"),
        ));
    }
    Ok(())
}

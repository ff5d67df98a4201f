//! Validation of submitted URLs.
//!
//! The service deliberately checks nothing beyond a non-empty value with an
//! `http://` or `https://` prefix. The stored original is the submitted string verbatim,
//! so deduplication is an exact string match.

use crate::error::AppError;
use serde_json::json;

/// Schemes a submitted URL may start with.
const ALLOWED_PREFIXES: &[&str] = &["http://", "https://"];

/// Errors that can occur during URL validation.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum UrlValidationError {
    #[error("url cannot be empty")]
    Empty,

    #[error("not a valid url")]
    UnsupportedScheme,
}

/// Checks that `input` is a non-empty HTTP or HTTPS URL.
///
/// # Errors
///
/// Returns [`UrlValidationError::Empty`] for an empty string.
/// Returns [`UrlValidationError::UnsupportedScheme`] when the scheme prefix is missing
/// or is not `http://` / `https://` (the check is case-sensitive).
pub fn check_url(input: &str) -> Result<(), UrlValidationError> {
    if input.is_empty() {
        return Err(UrlValidationError::Empty);
    }

    if !ALLOWED_PREFIXES.iter().any(|p| input.starts_with(p)) {
        return Err(UrlValidationError::UnsupportedScheme);
    }

    Ok(())
}

/// Same as [`check_url`], reported as [`AppError::Validation`].
pub fn validate_original_url(input: &str) -> Result<(), AppError> {
    check_url(input).map_err(|e| AppError::bad_request(e.to_string(), json!({ "url": input })))
}

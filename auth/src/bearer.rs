use http::header::AUTHORIZATION;
use http::HeaderMap;
use thiserror::Error;

/// Scheme prefix expected at the start of the `Authorization` header.
pub const BEARER_PREFIX: &str = "Bearer ";

/// Error type for bearer header extraction.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum BearerError {
    #[error("Missing Authorization header")]
    MissingHeader,

    #[error("Invalid Authorization header format. Expected: Bearer <token>")]
    MalformedHeader,
}

/// Extract the raw token from an `Authorization: Bearer <token>` header.
///
/// The remainder after the prefix is returned verbatim; deciding whether it is a
/// usable token is left to whoever consumes it.
///
/// # Errors
/// * `MissingHeader` - No `Authorization` header present
/// * `MalformedHeader` - Header is not visible ASCII or lacks the `Bearer ` prefix
pub fn extract_bearer(headers: &HeaderMap) -> Result<&str, BearerError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(BearerError::MissingHeader)?;

    let value = value.to_str().map_err(|_| BearerError::MalformedHeader)?;

    value
        .strip_prefix(BEARER_PREFIX)
        .ok_or(BearerError::MalformedHeader)
}

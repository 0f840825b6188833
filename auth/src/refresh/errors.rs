use thiserror::Error;

/// Error type for refresh token generation and liveness checks.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RefreshTokenError {
    #[error("Random source unavailable: {0}")]
    EntropyUnavailable(String),

    #[error("Refresh token lifetime out of range: {0}")]
    LifetimeOutOfRange(String),

    #[error("Refresh token has been revoked")]
    Revoked,

    #[error("Refresh token is expired")]
    Expired,
}

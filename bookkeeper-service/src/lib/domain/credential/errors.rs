use auth::AuthenticationError;
use auth::PasswordError;
use auth::Rejection;
use auth::RefreshTokenError;
use thiserror::Error;

use crate::user::errors::UserError;

/// Error for login, renewal, logout and request authorization.
///
/// Everything in the unauthenticated family is reported to remote callers as a
/// bare "unauthorized"; the variant is for logs only.
#[derive(Debug, Clone, Error)]
pub enum CredentialError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(#[from] Rejection),

    #[error("Refresh token not found")]
    RefreshTokenNotFound,

    #[error("Refresh token revoked")]
    RefreshTokenRevoked,

    #[error("Refresh token expired")]
    RefreshTokenExpired,

    // Infrastructure errors
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CredentialError {
    /// Whether the caller simply failed to prove who they are.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(
            self,
            CredentialError::InvalidCredentials
                | CredentialError::Unauthenticated(_)
                | CredentialError::RefreshTokenNotFound
                | CredentialError::RefreshTokenRevoked
                | CredentialError::RefreshTokenExpired
        )
    }
}

impl From<RefreshTokenError> for CredentialError {
    fn from(err: RefreshTokenError) -> Self {
        match err {
            RefreshTokenError::Revoked => CredentialError::RefreshTokenRevoked,
            RefreshTokenError::Expired => CredentialError::RefreshTokenExpired,
            RefreshTokenError::EntropyUnavailable(msg)
            | RefreshTokenError::LifetimeOutOfRange(msg) => CredentialError::Internal(msg),
        }
    }
}

impl From<AuthenticationError> for CredentialError {
    fn from(err: AuthenticationError) -> Self {
        match err {
            AuthenticationError::InvalidCredentials => CredentialError::InvalidCredentials,
            AuthenticationError::PasswordError(PasswordError::MalformedHash(msg)) => {
                CredentialError::MalformedInput(format!("Stored password hash is malformed: {}", msg))
            }
            AuthenticationError::PasswordError(err) => CredentialError::Internal(err.to_string()),
            AuthenticationError::JwtError(err) => CredentialError::Internal(err.to_string()),
        }
    }
}

impl From<UserError> for CredentialError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::DatabaseError(msg) => CredentialError::DatabaseError(msg),
            other => CredentialError::Internal(other.to_string()),
        }
    }
}

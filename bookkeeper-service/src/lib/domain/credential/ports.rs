use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use http::HeaderMap;

use crate::domain::credential::errors::CredentialError;
use crate::domain::credential::models::LoginCommand;
use crate::domain::credential::models::LoginOutcome;
use crate::domain::credential::models::RefreshToken;
use crate::domain::user::models::UserId;

/// Port for credential operations: login, renewal, logout and the request gate.
#[async_trait]
pub trait CredentialServicePort: Send + Sync + 'static {
    /// Verify an email/password pair and issue an access and a refresh token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password
    /// * `MalformedInput` - Stored password hash cannot be parsed
    /// * `DatabaseError` - Persistence failed
    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, CredentialError>;

    /// Exchange a live refresh token for a new access token.
    ///
    /// The refresh token itself is not rotated.
    ///
    /// # Errors
    /// * `RefreshTokenNotFound` - No such refresh token
    /// * `RefreshTokenRevoked` - Token was revoked
    /// * `RefreshTokenExpired` - Token is past its expiry
    /// * `DatabaseError` - Persistence failed
    async fn renew(&self, refresh_token: &str) -> Result<String, CredentialError>;

    /// Revoke a refresh token. Revoking an already revoked token succeeds.
    ///
    /// # Errors
    /// * `RefreshTokenNotFound` - No such refresh token
    /// * `DatabaseError` - Persistence failed
    async fn logout(&self, refresh_token: &str) -> Result<(), CredentialError>;

    /// Authorize a request by its bearer access token.
    ///
    /// # Returns
    /// The authenticated user
    ///
    /// # Errors
    /// * `Unauthenticated` - Header missing or malformed, or token invalid, foreign or expired
    fn authorize(&self, headers: &HeaderMap) -> Result<UserId, CredentialError>;
}

/// Persistence operations for refresh tokens.
///
/// Records are only ever inserted or revoked; nothing else may touch
/// `expires_at` or `revoked_at`.
#[async_trait]
pub trait RefreshTokenRepository: Send + Sync + 'static {
    /// Persist a freshly issued record.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed (including a token collision)
    async fn insert(&self, token: RefreshToken) -> Result<RefreshToken, CredentialError>;

    /// Exact-match lookup by token value, regardless of liveness.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_token(&self, token: &str) -> Result<Option<RefreshToken>, CredentialError>;

    /// Atomically set `revoked_at` unless it is already set.
    ///
    /// # Returns
    /// False if no record has this token
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn revoke(&self, token: &str, revoked_at: DateTime<Utc>)
        -> Result<bool, CredentialError>;
}

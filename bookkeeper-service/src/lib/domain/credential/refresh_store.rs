use std::sync::Arc;

use chrono::Duration;
use chrono::Utc;

use crate::domain::credential::errors::CredentialError;
use crate::domain::credential::models::RefreshToken;
use crate::domain::credential::ports::RefreshTokenRepository;
use crate::domain::user::models::UserId;

/// Issues, looks up and revokes refresh tokens over a repository.
pub struct RefreshTokenStore<TR>
where
    TR: RefreshTokenRepository,
{
    repository: Arc<TR>,
}

impl<TR> RefreshTokenStore<TR>
where
    TR: RefreshTokenRepository,
{
    pub fn new(repository: Arc<TR>) -> Self {
        Self { repository }
    }

    /// Mint and persist a refresh token for `subject`, valid for `ttl`.
    ///
    /// # Returns
    /// The opaque token value
    ///
    /// # Errors
    /// * `Internal` - OS random source failed
    /// * `DatabaseError` - Record could not be persisted
    pub async fn issue(&self, subject: UserId, ttl: Duration) -> Result<String, CredentialError> {
        let record = RefreshToken::issue(subject, ttl)?;
        let stored = self.repository.insert(record).await?;

        Ok(stored.token)
    }

    /// Fetch the record for `token` whatever its liveness.
    ///
    /// # Errors
    /// * `RefreshTokenNotFound` - No such token
    /// * `DatabaseError` - Lookup failed
    pub async fn lookup(&self, token: &str) -> Result<RefreshToken, CredentialError> {
        self.repository
            .find_by_token(token)
            .await?
            .ok_or(CredentialError::RefreshTokenNotFound)
    }

    /// Mark `token` revoked. A token that is already revoked keeps its
    /// original revocation time and the call still succeeds.
    ///
    /// # Errors
    /// * `RefreshTokenNotFound` - No such token
    /// * `DatabaseError` - Update failed
    pub async fn revoke(&self, token: &str) -> Result<(), CredentialError> {
        if self.repository.revoke(token, Utc::now()).await? {
            Ok(())
        } else {
            Err(CredentialError::RefreshTokenNotFound)
        }
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::Rejection;
use chrono::Duration;
use chrono::Utc;
use http::HeaderMap;

use crate::domain::credential::errors::CredentialError;
use crate::domain::credential::models::LoginCommand;
use crate::domain::credential::models::LoginOutcome;
use crate::domain::credential::ports::CredentialServicePort;
use crate::domain::credential::ports::RefreshTokenRepository;
use crate::domain::credential::refresh_store::RefreshTokenStore;
use crate::domain::user::models::UserId;
use crate::user::ports::UserRepository;

/// Domain service for login, token renewal and logout.
pub struct CredentialService<UR, TR>
where
    UR: UserRepository,
    TR: RefreshTokenRepository,
{
    users: Arc<UR>,
    refresh_tokens: RefreshTokenStore<TR>,
    authenticator: Arc<Authenticator>,
    refresh_token_ttl: Duration,
    // Verified against when the email is unknown so both login paths pay for Argon2.
    dummy_hash: String,
}

impl<UR, TR> CredentialService<UR, TR>
where
    UR: UserRepository,
    TR: RefreshTokenRepository,
{
    /// Create a new credential service.
    ///
    /// # Arguments
    /// * `users` - User lookup by email
    /// * `refresh_tokens` - Refresh token persistence
    /// * `authenticator` - Password verification and access token issuing
    /// * `refresh_token_ttl` - Lifetime of refresh tokens minted at login
    pub fn new(
        users: Arc<UR>,
        refresh_tokens: Arc<TR>,
        authenticator: Arc<Authenticator>,
        refresh_token_ttl: Duration,
    ) -> Self {
        let dummy_hash = auth::refresh::generate_token()
            .map_err(|e| e.to_string())
            .and_then(|secret| {
                authenticator
                    .hash_password(&secret)
                    .map_err(|e| e.to_string())
            })
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Could not prepare dummy password hash");
                String::new()
            });

        Self {
            users,
            refresh_tokens: RefreshTokenStore::new(refresh_tokens),
            authenticator,
            refresh_token_ttl,
            dummy_hash,
        }
    }
}

#[async_trait]
impl<UR, TR> CredentialServicePort for CredentialService<UR, TR>
where
    UR: UserRepository,
    TR: RefreshTokenRepository,
{
    async fn login(&self, command: LoginCommand) -> Result<LoginOutcome, CredentialError> {
        let found = self.users.find_by_email(&command.email).await?;

        let authenticator = Arc::clone(&self.authenticator);
        let password = command.password;
        let (stored_hash, subject) = match &found {
            Some(user) => (user.password_hash.clone(), user.id.to_string()),
            None => (self.dummy_hash.clone(), String::new()),
        };

        // Verification is CPU bound; keep it off the async workers.
        let authenticated = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(password.expose(), &stored_hash, &subject)
        })
        .await
        .map_err(|e| CredentialError::Internal(format!("Password verification task failed: {}", e)))?;

        let user = match found {
            Some(user) => user,
            None => {
                tracing::warn!("Login rejected: unknown email");
                return Err(CredentialError::InvalidCredentials);
            }
        };

        let access_token = match authenticated {
            Ok(result) => result.access_token,
            Err(err) => {
                let err = CredentialError::from(err);
                tracing::warn!(user_id = %user.id, error = %err, "Login rejected");
                return Err(err);
            }
        };

        let refresh_token = self
            .refresh_tokens
            .issue(user.id, self.refresh_token_ttl)
            .await?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginOutcome {
            user,
            access_token,
            refresh_token,
        })
    }

    async fn renew(&self, refresh_token: &str) -> Result<String, CredentialError> {
        let record = self.refresh_tokens.lookup(refresh_token).await?;
        record.ensure_live_at(Utc::now())?;

        let access_token = self
            .authenticator
            .issue_access_token(&record.subject.to_string())
            .map_err(|e| CredentialError::Internal(e.to_string()))?;

        tracing::info!(user_id = %record.subject, "Access token renewed");

        Ok(access_token)
    }

    async fn logout(&self, refresh_token: &str) -> Result<(), CredentialError> {
        self.refresh_tokens.revoke(refresh_token).await?;
        tracing::info!("Refresh token revoked");

        Ok(())
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<UserId, CredentialError> {
        let subject = self.authenticator.authorize(headers)?;

        UserId::from_string(&subject).map_err(|_| {
            CredentialError::Unauthenticated(Rejection::MalformedToken(
                "subject is not a user id".to_string(),
            ))
        })
    }
}

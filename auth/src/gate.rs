use chrono::DateTime;
use chrono::Utc;
use http::HeaderMap;
use thiserror::Error;

use crate::bearer::extract_bearer;
use crate::bearer::BearerError;
use crate::jwt::AccessTokenCodec;
use crate::jwt::JwtError;

/// Why a request was refused by the [`AuthorizationGate`].
///
/// The reason is meant for logs. Remote callers should only ever learn that the
/// request was unauthorized.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("missing Authorization header")]
    MissingHeader,

    #[error("malformed Authorization header")]
    MalformedHeader,

    #[error("malformed access token: {0}")]
    MalformedToken(String),

    #[error("access token signature is invalid")]
    InvalidSignature,

    #[error("access token issuer is not recognised")]
    WrongIssuer,

    #[error("access token is expired")]
    Expired,

    #[error("access token could not be processed: {0}")]
    Internal(String),
}

impl From<BearerError> for Rejection {
    fn from(err: BearerError) -> Self {
        match err {
            BearerError::MissingHeader => Rejection::MissingHeader,
            BearerError::MalformedHeader => Rejection::MalformedHeader,
        }
    }
}

impl From<JwtError> for Rejection {
    fn from(err: JwtError) -> Self {
        match err {
            JwtError::Malformed(msg) => Rejection::MalformedToken(msg),
            JwtError::InvalidSignature => Rejection::InvalidSignature,
            JwtError::WrongIssuer => Rejection::WrongIssuer,
            JwtError::Expired => Rejection::Expired,
            JwtError::EncodingFailed(msg) => Rejection::Internal(msg),
        }
    }
}

/// Composition point every protected operation passes through.
///
/// Extracts the bearer token, validates it as an access token and yields the
/// authenticated subject. Each step short-circuits on failure.
#[derive(Debug, Clone)]
pub struct AuthorizationGate {
    codec: AccessTokenCodec,
}

impl AuthorizationGate {
    pub fn new(codec: AccessTokenCodec) -> Self {
        Self { codec }
    }

    /// Authorize a request from its headers.
    ///
    /// # Returns
    /// The subject bound in the access token
    ///
    /// # Errors
    /// * `Rejection` - First failed check, in order: header, signature, issuer, expiry
    pub fn authorize(&self, headers: &HeaderMap) -> Result<String, Rejection> {
        self.authorize_at(headers, Utc::now())
    }

    /// Authorize a request as if the current time were `now`.
    pub fn authorize_at(
        &self,
        headers: &HeaderMap,
        now: DateTime<Utc>,
    ) -> Result<String, Rejection> {
        let token = extract_bearer(headers)?;
        let subject = self.codec.validate_at(token, now)?;
        Ok(subject)
    }

    pub fn codec(&self) -> &AccessTokenCodec {
        &self.codec
    }
}

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use super::errors::RefreshTokenError;

/// Bytes of entropy in a refresh token (hex encoded to twice as many characters).
pub const TOKEN_BYTES: usize = 32;

/// Generate a fresh opaque refresh token from the OS random source.
///
/// # Errors
/// * `EntropyUnavailable` - The OS random source failed
pub fn generate_token() -> Result<String, RefreshTokenError> {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| RefreshTokenError::EntropyUnavailable(e.to_string()))?;

    Ok(hex::encode(bytes))
}

/// A persisted refresh credential owned by subject `S`.
///
/// A record is live while it is not revoked and the current time is before
/// `expires_at`. Once set, `revoked_at` never changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshTokenRecord<S> {
    pub token: String,
    pub subject: S,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked_at: Option<DateTime<Utc>>,
}

impl<S> RefreshTokenRecord<S> {
    /// Mint a new record for `subject` with a freshly generated token.
    ///
    /// # Errors
    /// * `EntropyUnavailable` - The OS random source failed
    /// * `LifetimeOutOfRange` - `ttl` pushes the expiry past the representable date range
    pub fn issue(subject: S, ttl: Duration) -> Result<Self, RefreshTokenError> {
        Self::issue_at(subject, Utc::now(), ttl)
    }

    /// Mint a new record as if the current time were `now`.
    pub fn issue_at(
        subject: S,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, RefreshTokenError> {
        let expires_at = now.checked_add_signed(ttl).ok_or_else(|| {
            RefreshTokenError::LifetimeOutOfRange(format!("{}s", ttl.num_seconds()))
        })?;

        Ok(Self {
            token: generate_token()?,
            subject,
            created_at: now,
            expires_at,
            revoked_at: None,
        })
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.ensure_live_at(now).is_ok()
    }

    /// Explain why the record is not live, checking revocation before expiry.
    pub fn ensure_live_at(&self, now: DateTime<Utc>) -> Result<(), RefreshTokenError> {
        if self.is_revoked() {
            Err(RefreshTokenError::Revoked)
        } else if self.is_expired_at(now) {
            Err(RefreshTokenError::Expired)
        } else {
            Ok(())
        }
    }

    /// Mark the record revoked at `now` unless it already is.
    ///
    /// # Returns
    /// True if this call performed the revocation
    pub fn revoke_at(&mut self, now: DateTime<Utc>) -> bool {
        if self.revoked_at.is_some() {
            return false;
        }
        self.revoked_at = Some(now);
        true
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_generate_token_shape() {
        let token = generate_token().unwrap();

        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generated_tokens_are_unique() {
        let tokens: HashSet<String> = (0..1000).map(|_| generate_token().unwrap()).collect();
        assert_eq!(tokens.len(), 1000);
    }

    #[test]
    fn test_issue_sets_expiry() {
        let now = Utc::now();
        let record = RefreshTokenRecord::issue_at("user123", now, Duration::days(60)).unwrap();

        assert_eq!(record.subject, "user123");
        assert_eq!(record.created_at, now);
        assert_eq!(record.expires_at, now + Duration::days(60));
        assert!(record.revoked_at.is_none());
        assert!(record.is_live_at(now));
    }

    #[test]
    fn test_expiry_is_strict() {
        let now = Utc::now();
        let record = RefreshTokenRecord::issue_at(1u32, now, Duration::hours(1)).unwrap();

        assert!(record.is_live_at(now + Duration::minutes(59)));
        assert_eq!(
            record.ensure_live_at(now + Duration::hours(1)),
            Err(RefreshTokenError::Expired)
        );
    }

    #[test]
    fn test_revocation_is_permanent() {
        let now = Utc::now();
        let mut record = RefreshTokenRecord::issue_at(1u32, now, Duration::hours(1)).unwrap();

        assert!(record.revoke_at(now + Duration::minutes(1)));
        assert!(!record.revoke_at(now + Duration::minutes(2)));
        assert_eq!(record.revoked_at, Some(now + Duration::minutes(1)));
        assert_eq!(record.ensure_live_at(now), Err(RefreshTokenError::Revoked));
    }

    #[test]
    fn test_revoked_reported_before_expired() {
        let now = Utc::now();
        let mut record = RefreshTokenRecord::issue_at(1u32, now, Duration::hours(1)).unwrap();
        record.revoke_at(now);

        assert_eq!(
            record.ensure_live_at(now + Duration::days(1)),
            Err(RefreshTokenError::Revoked)
        );
    }

    #[test]
    fn test_overflowing_ttl_is_an_error() {
        let result = RefreshTokenRecord::issue("user123", Duration::seconds(10_000_000_000_000));
        assert!(matches!(
            result,
            Err(RefreshTokenError::LifetimeOutOfRange(_))
        ));
    }
}

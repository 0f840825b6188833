use std::fmt;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::JwtError;

/// Issues and validates signed access tokens.
///
/// Tokens are HS256 JWTs signed with a single server-held secret. The secret is
/// captured at construction and never exposed again, not even through `Debug`.
#[derive(Clone)]
pub struct AccessTokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
}

impl AccessTokenCodec {
    /// Create a new codec with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
        }
    }

    /// Issue an access token for `subject`, valid for `ttl` from now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Serialization or signing failed
    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<String, JwtError> {
        self.issue_at(subject, Utc::now(), ttl)
    }

    /// Issue an access token as if the current time were `now`.
    pub fn issue_at(
        &self,
        subject: &str,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, JwtError> {
        self.sign(&Claims::new(subject, now, ttl)?)
    }

    /// Validate a token and return its subject.
    ///
    /// Checks run in a fixed order and stop at the first failure:
    /// signature, then issuer, then expiry.
    ///
    /// # Errors
    /// * `Malformed` - Token cannot be decoded into the expected claims
    /// * `InvalidSignature` - Signature does not verify against this codec's secret
    /// * `WrongIssuer` - Token was not issued by this system
    /// * `Expired` - Current time is at or past the token's expiry
    pub fn validate(&self, token: &str) -> Result<String, JwtError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token as if the current time were `now`.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<String, JwtError> {
        let claims = self.verify(token)?;

        if !claims.has_expected_issuer() {
            return Err(JwtError::WrongIssuer);
        }

        if claims.is_expired(now.timestamp()) {
            return Err(JwtError::Expired);
        }

        Ok(claims.sub)
    }

    pub(crate) fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    // Signature only; issuer and expiry are checked by the caller so their order is ours.
    fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|token_data| token_data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    JwtError::InvalidSignature
                }
                _ => JwtError::Malformed(e.to_string()),
            })
    }
}

impl fmt::Debug for AccessTokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessTokenCodec")
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    #[test]
    fn test_issue_and_validate() {
        let codec = AccessTokenCodec::new(SECRET);

        let token = codec
            .issue("user123", Duration::minutes(5))
            .expect("Failed to issue token");
        assert!(!token.is_empty());

        let subject = codec.validate(&token).expect("Failed to validate token");
        assert_eq!(subject, "user123");
    }

    #[test]
    fn test_validate_garbage_token() {
        let codec = AccessTokenCodec::new(SECRET);

        let result = codec.validate("invalid.token.here");
        assert!(matches!(result, Err(JwtError::Malformed(_))));

        let result = codec.validate("");
        assert!(matches!(result, Err(JwtError::Malformed(_))));
    }

    #[test]
    fn test_validate_with_wrong_secret() {
        let codec1 = AccessTokenCodec::new(b"secret1_at_least_32_bytes_long_key!");
        let codec2 = AccessTokenCodec::new(b"secret2_at_least_32_bytes_long_key!");

        let token = codec1.issue("user123", Duration::minutes(5)).unwrap();

        assert_eq!(codec2.validate(&token), Err(JwtError::InvalidSignature));
    }

    #[test]
    fn test_validate_tampered_payload() {
        let codec = AccessTokenCodec::new(SECRET);
        let token = codec.issue("user123", Duration::minutes(5)).unwrap();
        let forged = codec.issue("admin", Duration::minutes(5)).unwrap();

        // Splice the payload of one token onto the signature of another.
        let parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        let spliced = format!("{}.{}.{}", parts[0], forged_parts[1], parts[2]);

        assert_eq!(codec.validate(&spliced), Err(JwtError::InvalidSignature));
    }

    #[test]
    fn test_validate_wrong_issuer() {
        let codec = AccessTokenCodec::new(SECRET);
        let claims = Claims::new("user123", Utc::now(), Duration::minutes(5))
            .unwrap()
            .with_issuer("other-service");
        let token = codec.sign(&claims).unwrap();

        assert_eq!(codec.validate(&token), Err(JwtError::WrongIssuer));
    }

    #[test]
    fn test_issuer_checked_before_expiry() {
        let codec = AccessTokenCodec::new(SECRET);
        let issued_at = Utc::now() - Duration::hours(2);
        let claims = Claims::new("user123", issued_at, Duration::minutes(5))
            .unwrap()
            .with_issuer("other-service");
        let token = codec.sign(&claims).unwrap();

        assert_eq!(codec.validate(&token), Err(JwtError::WrongIssuer));
    }

    #[test]
    fn test_validate_expired() {
        let codec = AccessTokenCodec::new(SECRET);
        let now = Utc::now();
        let token = codec
            .issue_at("user123", now, Duration::seconds(5))
            .unwrap();

        assert_eq!(
            codec.validate_at(&token, now + Duration::seconds(4)),
            Ok("user123".to_string())
        );
        assert_eq!(
            codec.validate_at(&token, now + Duration::seconds(5)),
            Err(JwtError::Expired)
        );
        assert_eq!(
            codec.validate_at(&token, now + Duration::hours(1)),
            Err(JwtError::Expired)
        );
    }

    #[test]
    fn test_zero_ttl_is_immediately_expired() {
        let codec = AccessTokenCodec::new(SECRET);
        let token = codec.issue("user123", Duration::zero()).unwrap();

        assert_eq!(codec.validate(&token), Err(JwtError::Expired));
    }

    #[test]
    fn test_issue_with_overflowing_ttl_fails() {
        let codec = AccessTokenCodec::new(SECRET);
        let result = codec.issue("user123", Duration::seconds(10_000_000_000_000));

        assert!(matches!(result, Err(JwtError::EncodingFailed(_))));
    }

    #[test]
    fn test_debug_hides_secret() {
        let codec = AccessTokenCodec::new(SECRET);
        let rendered = format!("{:?}", codec);

        assert!(!rendered.contains("my_secret_key"));
    }
}

//! Authentication core
//!
//! Provides the credential machinery every protected operation depends on:
//! - Password hashing (Argon2id, self-describing PHC strings)
//! - Access tokens (HS256 JWT with a fixed issuer and strict expiry)
//! - Bearer header extraction
//! - Opaque refresh token generation and liveness rules
//! - An authorization gate tying header, signature, issuer and expiry checks together
//!
//! The crate performs no I/O. Persisting refresh tokens is left to the service,
//! which defines its own repository ports around [`RefreshTokenRecord`].
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::AccessTokenCodec;
//! use chrono::Duration;
//!
//! let codec = AccessTokenCodec::new(b"secret_key_at_least_32_bytes_long!");
//! let token = codec.issue("user123", Duration::minutes(15)).unwrap();
//! assert_eq!(codec.validate(&token).unwrap(), "user123");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, RefreshTokenRecord};
//! use chrono::Duration;
//!
//! let auth = Authenticator::new(b"secret_key_at_least_32_bytes_long!", Duration::minutes(15));
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify, issue an access token and a refresh token
//! let result = auth.authenticate("password123", &hash, "user123").unwrap();
//! let refresh = RefreshTokenRecord::issue("user123", Duration::days(60)).unwrap();
//!
//! // Validate token
//! assert_eq!(auth.validate_token(&result.access_token).unwrap(), "user123");
//! assert!(refresh.is_live_at(chrono::Utc::now()));
//! ```

pub mod authenticator;
pub mod bearer;
pub mod gate;
pub mod jwt;
pub mod password;
pub mod refresh;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use bearer::extract_bearer;
pub use bearer::BearerError;
pub use gate::AuthorizationGate;
pub use gate::Rejection;
pub use jwt::AccessTokenCodec;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use refresh::RefreshTokenError;
pub use refresh::RefreshTokenRecord;

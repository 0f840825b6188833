use std::env;
use std::time::Duration;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use secrecy::ExposeSecret;
use secrecy::SecretString;
use serde::Deserialize;

/// Longest lifetime accepted for either token kind (ten years).
pub const MAX_TTL_SECS: i64 = 10 * 365 * 24 * 60 * 60;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
    pub request_timeout_secs: u64,
}

/// Token settings. The secret is redacted from `Debug` output.
#[derive(Debug, Deserialize)]
pub struct JwtConfig {
    pub secret: SecretString,
    pub access_token_ttl_secs: i64,
    pub refresh_token_ttl_secs: i64,
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl JwtConfig {
    pub fn secret_bytes(&self) -> &[u8] {
        self.secret.expose_secret().as_bytes()
    }

    pub fn access_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.access_token_ttl_secs)
    }

    pub fn refresh_token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.refresh_token_ttl_secs)
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // No prefix: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject settings the service cannot run safely with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.expose_secret().is_empty() {
            return Err(ConfigError::Message("jwt.secret must not be empty".into()));
        }
        validate_ttl("jwt.access_token_ttl_secs", self.jwt.access_token_ttl_secs)?;
        validate_ttl("jwt.refresh_token_ttl_secs", self.jwt.refresh_token_ttl_secs)?;
        Ok(())
    }
}

fn validate_ttl(key: &str, secs: i64) -> Result<(), ConfigError> {
    if secs <= 0 {
        return Err(ConfigError::Message(format!("{} must be positive", key)));
    }
    if secs > MAX_TTL_SECS {
        return Err(ConfigError::Message(format!(
            "{} must not exceed {} seconds",
            key, MAX_TTL_SECS
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str, access: i64, refresh: i64) -> Config {
        Config {
            database: DatabaseConfig {
                url: "postgresql://localhost/bookkeeper".to_string(),
                max_connections: 5,
                acquire_timeout_secs: 5,
            },
            server: ServerConfig {
                http_port: 8080,
                request_timeout_secs: 30,
            },
            jwt: JwtConfig {
                secret: SecretString::new(secret.to_string()),
                access_token_ttl_secs: access,
                refresh_token_ttl_secs: refresh,
            },
        }
    }

    #[test]
    fn test_validate_accepts_sane_config() {
        assert!(config("a-long-enough-secret", 900, 86400).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_secret() {
        assert!(config("", 900, 86400).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_ttls() {
        assert!(config("secret", 0, 86400).validate().is_err());
        assert!(config("secret", 900, -1).validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_ttls() {
        assert!(config("secret", MAX_TTL_SECS, MAX_TTL_SECS).validate().is_ok());
        assert!(config("secret", MAX_TTL_SECS + 1, 86400).validate().is_err());
        assert!(config("secret", 900, 10_000_000_000_000).validate().is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", config("super-secret-value", 900, 86400));
        assert!(!rendered.contains("super-secret-value"));
    }

    #[test]
    fn test_ttl_conversions() {
        let config = config("secret", 900, 86400);
        assert_eq!(config.jwt.access_token_ttl(), chrono::Duration::minutes(15));
        assert_eq!(config.jwt.refresh_token_ttl(), chrono::Duration::days(1));
        assert_eq!(config.server.request_timeout(), Duration::from_secs(30));
    }
}

use std::env;

use auth::TokenConfig;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Minimum length of the HS256 signing secret, in bytes.
pub const MIN_JWT_SECRET_BYTES: usize = 32;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub kafka: KafkaConfig,
    pub verification: VerificationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub access_ttl_minutes: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    pub topic: String,
}

/// Settings for the link embedded in verification emails.
#[derive(Debug, Deserialize, Clone)]
pub struct VerificationConfig {
    pub base_url: String,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// # Errors
    /// Missing keys, type mismatches, or values rejected by `validate`
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .set_default("jwt.issuer", "identity-service")?
            .set_default("jwt.access_ttl_minutes", 15)?
            .set_default("kafka.topic", "user.registered")?
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject configurations the service must not start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(ConfigError::Message(format!(
                "jwt.secret must be at least {} bytes",
                MIN_JWT_SECRET_BYTES
            )));
        }

        if self.jwt.access_ttl_minutes <= 0 {
            return Err(ConfigError::Message(
                "jwt.access_ttl_minutes must be positive".to_string(),
            ));
        }

        if self.verification.base_url.trim().is_empty() {
            return Err(ConfigError::Message(
                "verification.base_url must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// Signing configuration handed to the token signer at startup.
    pub fn token_config(&self) -> TokenConfig {
        TokenConfig {
            secret: self.jwt.secret.clone(),
            issuer: self.jwt.issuer.clone(),
            access_ttl: chrono::Duration::minutes(self.jwt.access_ttl_minutes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            database: DatabaseConfig {
                url: "postgresql://localhost/identity".to_string(),
            },
            server: ServerConfig { http_port: 8080 },
            jwt: JwtConfig {
                secret: "a".repeat(MIN_JWT_SECRET_BYTES),
                issuer: "identity-service".to_string(),
                access_ttl_minutes: 15,
            },
            kafka: KafkaConfig {
                brokers: "localhost:9092".to_string(),
                topic: "user.registered".to_string(),
            },
            verification: VerificationConfig {
                base_url: "http://localhost:8080".to_string(),
            },
        }
    }

    #[test]
    fn test_validate_accepts_defaults() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_short_secret() {
        let mut config = config();
        config.jwt.secret = "short".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_ttl() {
        let mut config = config();
        config.jwt.access_ttl_minutes = 0;

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_base_url() {
        let mut config = config();
        config.verification.base_url = "  ".to_string();

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_token_config() {
        let token_config = config().token_config();

        assert_eq!(token_config.issuer, "identity-service");
        assert_eq!(token_config.access_ttl, chrono::Duration::minutes(15));
    }
}

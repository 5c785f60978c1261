use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

/// Application configuration for notification-service.
///
/// Loaded from configuration files with environment variable overrides.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub kafka: KafkaConfig,
    pub email: EmailConfig,
}

/// Kafka consumer configuration for registration events.
#[derive(Debug, Deserialize, Clone)]
pub struct KafkaConfig {
    pub brokers: String,
    pub topic: String,
    pub group_id: String,
}

/// How verification emails leave the service.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmailTransport {
    /// Write the rendered email to the log. For local development.
    Log,
    /// Post the email to a Postmark-compatible HTTP API.
    Http,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailConfig {
    pub sender: String,
    pub transport: EmailTransport,
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_timeout_seconds() -> u64 {
    10
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (KAFKA__BROKERS, EMAIL__API_TOKEN, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .set_default("kafka.topic", "user.registered")?
            .set_default("kafka.group_id", "notification-service")?
            .set_default("email.transport", "log")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: EMAIL__API_TOKEN=... overrides email.api_token
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.kafka.group_id.trim().is_empty() {
            return Err(ConfigError::Message(
                "kafka.group_id must not be empty".to_string(),
            ));
        }

        if self.email.sender.trim().is_empty() {
            return Err(ConfigError::Message(
                "email.sender must not be empty".to_string(),
            ));
        }

        if self.email.transport == EmailTransport::Http {
            let has_url = self
                .email
                .api_url
                .as_deref()
                .is_some_and(|url| !url.trim().is_empty());
            let has_token = self
                .email
                .api_token
                .as_deref()
                .is_some_and(|token| !token.trim().is_empty());

            if !has_url || !has_token {
                return Err(ConfigError::Message(
                    "email.api_url and email.api_token are required for the http transport"
                        .to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(transport: EmailTransport) -> Config {
        Config {
            kafka: KafkaConfig {
                brokers: "localhost:9092".to_string(),
                topic: "user.registered".to_string(),
                group_id: "notification-service".to_string(),
            },
            email: EmailConfig {
                sender: "no-reply@localhost".to_string(),
                transport,
                api_url: None,
                api_token: None,
                timeout_seconds: 10,
            },
        }
    }

    #[test]
    fn test_log_transport_needs_no_credentials() {
        assert!(config(EmailTransport::Log).validate().is_ok());
    }

    #[test]
    fn test_http_transport_requires_credentials() {
        let mut config = config(EmailTransport::Http);
        assert!(config.validate().is_err());

        config.email.api_url = Some("https://api.postmarkapp.com".to_string());
        assert!(config.validate().is_err());

        config.email.api_token = Some("server-token".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rejects_empty_group_id() {
        let mut config = config(EmailTransport::Log);
        config.kafka.group_id = String::new();

        assert!(config.validate().is_err());
    }
}

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::config::EmailConfig;
use crate::domain::notification::errors::EmailSendError;
use crate::domain::notification::models::VerificationEmail;
use crate::domain::notification::ports::EmailSender;

pub const AUTH_HEADER: &str = "X-Postmark-Server-Token";
const MESSAGE_STREAM: &str = "outbound";

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text_body: &'a str,
    message_stream: &'a str,
}

/// Sends email through a Postmark-compatible `POST {api_url}/email` endpoint.
pub struct HttpEmailSender {
    http_client: Client,
    endpoint: String,
    sender: String,
    api_token: String,
}

impl HttpEmailSender {
    pub fn new(
        api_url: &str,
        sender: impl Into<String>,
        api_token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, anyhow::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            endpoint: format!("{}/email", api_url.trim().trim_end_matches('/')),
            sender: sender.into(),
            api_token: api_token.into(),
        })
    }

    pub fn from_config(config: &EmailConfig) -> Result<Self, anyhow::Error> {
        let api_url = config
            .api_url
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("email.api_url is not configured"))?;
        let api_token = config
            .api_token
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("email.api_token is not configured"))?;

        Self::new(
            api_url,
            config.sender.clone(),
            api_token,
            Duration::from_secs(config.timeout_seconds),
        )
    }
}

#[async_trait]
impl EmailSender for HttpEmailSender {
    #[tracing::instrument(name = "send_email", skip_all, fields(to = %email.to))]
    async fn send(&self, email: &VerificationEmail) -> Result<(), EmailSendError> {
        let request_body = SendEmailRequest {
            from: &self.sender,
            to: &email.to,
            subject: &email.subject,
            text_body: &email.text_body,
            message_stream: MESSAGE_STREAM,
        };

        let response = self
            .http_client
            .post(&self.endpoint)
            .header(AUTH_HEADER, &self.api_token)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| EmailSendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmailSendError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

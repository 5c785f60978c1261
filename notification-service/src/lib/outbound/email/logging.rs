use async_trait::async_trait;

use crate::domain::notification::errors::EmailSendError;
use crate::domain::notification::models::VerificationEmail;
use crate::domain::notification::ports::EmailSender;

/// Writes emails to the log instead of delivering them.
///
/// The link carries a live verification token, so it is only logged at debug.
#[derive(Debug, Default, Clone)]
pub struct LoggingEmailSender;

impl LoggingEmailSender {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl EmailSender for LoggingEmailSender {
    async fn send(&self, email: &VerificationEmail) -> Result<(), EmailSendError> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            "Email not delivered (log transport)"
        );
        tracing::debug!(to = %email.to, link = %email.link, "Verification link");
        Ok(())
    }
}

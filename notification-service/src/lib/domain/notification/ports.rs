use async_trait::async_trait;

use super::errors::EmailSendError;
use super::errors::NotificationError;
use super::models::RegistrationEvent;
use super::models::VerificationEmail;

#[async_trait]
pub trait NotificationServicePort: Send + Sync + 'static {
    /// Render and deliver the verification email for a new registration.
    async fn send_verification(&self, event: &RegistrationEvent) -> Result<(), NotificationError>;
}

/// Outbound email delivery.
#[async_trait]
pub trait EmailSender: Send + Sync + 'static {
    async fn send(&self, email: &VerificationEmail) -> Result<(), EmailSendError>;
}

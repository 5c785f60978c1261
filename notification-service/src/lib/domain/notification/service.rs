use std::sync::Arc;

use async_trait::async_trait;

use super::errors::NotificationError;
use super::models::RegistrationEvent;
use super::models::VerificationEmail;
use super::ports::EmailSender;
use super::ports::NotificationServicePort;

pub struct NotificationService<ES: EmailSender> {
    email_sender: Arc<ES>,
}

impl<ES: EmailSender> NotificationService<ES> {
    pub fn new(email_sender: Arc<ES>) -> Self {
        Self { email_sender }
    }
}

#[async_trait]
impl<ES: EmailSender> NotificationServicePort for NotificationService<ES> {
    async fn send_verification(&self, event: &RegistrationEvent) -> Result<(), NotificationError> {
        event.validate()?;

        let email = VerificationEmail::for_registration(event);
        self.email_sender.send(&email).await?;

        tracing::info!(
            account_id = %event.account_id,
            event_id = event.event_id.as_deref().unwrap_or("-"),
            "Verification email sent"
        );

        Ok(())
    }
}

use chrono::DateTime;
use chrono::Utc;

use super::errors::NotificationError;

/// Path on identity-service that redeems a verification token.
pub const VERIFY_PATH: &str = "/auth/verify";

pub const VERIFICATION_SUBJECT: &str = "Confirm your registration";

/// A freshly registered account waiting for its verification email.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationEvent {
    pub event_id: Option<String>,
    pub account_id: String,
    pub email: String,
    pub name: String,
    pub verification_token: String,
    pub base_url: String,
    pub registered_at: Option<DateTime<Utc>>,
}

impl RegistrationEvent {
    /// Reject events that cannot produce a usable email.
    pub fn validate(&self) -> Result<(), NotificationError> {
        if !email_address::EmailAddress::is_valid(self.email.trim()) {
            return Err(NotificationError::InvalidEvent(format!(
                "recipient '{}' is not an email address",
                self.email
            )));
        }

        let token = self.verification_token.trim();
        if token.is_empty() {
            return Err(NotificationError::InvalidEvent(
                "verification token is empty".to_string(),
            ));
        }

        // Only hex tokens are issued, and they go into the link unescaped.
        if !token.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(NotificationError::InvalidEvent(
                "verification token is not hex".to_string(),
            ));
        }

        if self.base_url.trim().is_empty() {
            return Err(NotificationError::InvalidEvent(
                "base url is empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Rendered verification email, ready for a sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationEmail {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub link: String,
}

impl VerificationEmail {
    pub fn for_registration(event: &RegistrationEvent) -> Self {
        let link = verification_link(&event.base_url, &event.verification_token);
        let greeting = if event.name.trim().is_empty() {
            "Hello,".to_string()
        } else {
            format!("Hello {},", event.name.trim())
        };

        let text_body = format!(
            "{greeting}\n\n\
             Thanks for signing up. Please confirm your registration by opening the link below:\n\n\
             {link}\n\n\
             If you did not create an account, you can ignore this email.\n"
        );

        Self {
            to: event.email.trim().to_string(),
            subject: VERIFICATION_SUBJECT.to_string(),
            text_body,
            link,
        }
    }
}

/// `{base_url}/auth/verify?token={token}`, tolerating a trailing slash on the base.
///
/// Callers pass tokens that `RegistrationEvent::validate` accepted.
pub fn verification_link(base_url: &str, token: &str) -> String {
    format!(
        "{}{}?token={}",
        base_url.trim().trim_end_matches('/'),
        VERIFY_PATH,
        token.trim()
    )
}

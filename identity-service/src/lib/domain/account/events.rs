use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::domain::account::models::Account;
use crate::domain::account::models::VerificationToken;

/// Domain event published once a pending account has been stored.
///
/// Carries everything the notification side needs to render the verification
/// link. The account store stays the source of truth for the token.
#[derive(Debug, Clone)]
pub struct AccountRegisteredEvent {
    pub event_id: String,
    pub account_id: String,
    pub email: String,
    pub name: String,
    pub verification_token: String,
    pub base_url: String,
    pub registered_at: DateTime<Utc>,
}

impl AccountRegisteredEvent {
    /// Create a new AccountRegistered event from a stored account.
    ///
    /// # Arguments
    /// * `account` - Account that was created
    /// * `token` - Verification token stored with the account
    /// * `base_url` - Public base URL for the verification link
    pub fn new(account: &Account, token: &VerificationToken, base_url: &str) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            account_id: account.id.to_string(),
            email: account.email.as_str().to_string(),
            name: account.display_name(),
            verification_token: token.as_str().to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            registered_at: account.created_at,
        }
    }
}

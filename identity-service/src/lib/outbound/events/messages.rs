use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::account::events::AccountRegisteredEvent;

/// Serializable message for the AccountRegistered domain event.
///
/// Wire contract of the registration topic: one JSON object per
/// registration, keyed by recipient email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRegisteredMessage {
    pub event_id: String,
    pub account_id: String,
    pub email: String,
    pub name: String,
    pub verification_token: String,
    pub base_url: String,
    pub registered_at: DateTime<Utc>,
}

impl From<&AccountRegisteredEvent> for AccountRegisteredMessage {
    fn from(event: &AccountRegisteredEvent) -> Self {
        Self {
            event_id: event.event_id.clone(),
            account_id: event.account_id.clone(),
            email: event.email.clone(),
            name: event.name.clone(),
            verification_token: event.verification_token.clone(),
            base_url: event.base_url.clone(),
            registered_at: event.registered_at,
        }
    }
}

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use crate::domain::notification::models::RegistrationEvent;

/// Wire format of the registration event published by identity-service.
///
/// Unknown fields are ignored so the producer can add fields without a coordinated deploy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRegisteredMessage {
    #[serde(default)]
    pub event_id: Option<String>,
    pub account_id: String,
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub verification_token: String,
    pub base_url: String,
    #[serde(default)]
    pub registered_at: Option<DateTime<Utc>>,
}

impl From<AccountRegisteredMessage> for RegistrationEvent {
    fn from(message: AccountRegisteredMessage) -> Self {
        Self {
            event_id: message.event_id,
            account_id: message.account_id,
            email: message.email,
            name: message.name,
            verification_token: message.verification_token,
            base_url: message.base_url,
            registered_at: message.registered_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_producer_payload() {
        let payload = r#"{
            "event_id": "3f1e8a4c-1111-4000-8000-000000000000",
            "account_id": "6a1c3f0e-0000-4000-8000-000000000001",
            "email": "alice@x.com",
            "name": "Alice Doe",
            "verification_token": "abc123",
            "base_url": "http://localhost:8080",
            "registered_at": "2025-01-01T12:00:00Z",
            "schema_version": 2
        }"#;

        let message: AccountRegisteredMessage = serde_json::from_str(payload).unwrap();
        let event = RegistrationEvent::from(message);

        assert_eq!(event.email, "alice@x.com");
        assert_eq!(event.verification_token, "abc123");
        assert!(event.registered_at.is_some());
    }

    #[test]
    fn test_missing_token_is_rejected() {
        let payload = r#"{"account_id": "a", "email": "alice@x.com", "base_url": "http://x"}"#;

        assert!(serde_json::from_str::<AccountRegisteredMessage>(payload).is_err());
    }
}

//! Registration record in, verification email out, without a broker.

use std::sync::Arc;
use std::sync::Mutex;

use async_trait::async_trait;
use notification_service::domain::notification::errors::EmailSendError;
use notification_service::domain::notification::models::VerificationEmail;
use notification_service::domain::notification::ports::EmailSender;
use notification_service::domain::notification::service::NotificationService;
use notification_service::inbound::events::consumer::handle_payload;
use notification_service::inbound::events::consumer::MessageProcessingError;

#[derive(Default)]
struct Outbox {
    sent: Mutex<Vec<VerificationEmail>>,
}

#[async_trait]
impl EmailSender for Outbox {
    async fn send(&self, email: &VerificationEmail) -> Result<(), EmailSendError> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

fn payload(email: &str, token: &str) -> Vec<u8> {
    serde_json::json!({
        "event_id": "3f1e8a4c-1111-4000-8000-000000000000",
        "account_id": "6a1c3f0e-0000-4000-8000-000000000001",
        "email": email,
        "name": "Alice Doe",
        "verification_token": token,
        "base_url": "http://localhost:8080/",
        "registered_at": "2025-01-01T12:00:00Z"
    })
    .to_string()
    .into_bytes()
}

#[tokio::test]
async fn test_registration_record_produces_verification_email() {
    let outbox = Arc::new(Outbox::default());
    let service = NotificationService::new(Arc::clone(&outbox));

    handle_payload(&service, Some(payload("alice@x.com", "abc123").as_slice()))
        .await
        .unwrap();

    let sent = outbox.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "alice@x.com");
    assert_eq!(sent[0].link, "http://localhost:8080/auth/verify?token=abc123");
}

#[tokio::test]
async fn test_bad_records_do_not_stop_later_ones() {
    let outbox = Arc::new(Outbox::default());
    let service = NotificationService::new(Arc::clone(&outbox));

    let records: Vec<Option<Vec<u8>>> = vec![
        None,
        Some(b"garbage".to_vec()),
        Some(payload("not-an-email", "abc123")),
        Some(payload("bob@x.com", "def456")),
    ];

    let mut failures = 0;
    for record in &records {
        if handle_payload(&service, record.as_deref()).await.is_err() {
            failures += 1;
        }
    }

    assert_eq!(failures, 3);
    let sent = outbox.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "bob@x.com");
}

#[tokio::test]
async fn test_invalid_recipient_is_handling_error() {
    let outbox = Arc::new(Outbox::default());
    let service = NotificationService::new(Arc::clone(&outbox));

    let result = handle_payload(&service, Some(payload("not-an-email", "abc123").as_slice())).await;

    assert!(matches!(
        result,
        Err(MessageProcessingError::HandlingError(_))
    ));
}

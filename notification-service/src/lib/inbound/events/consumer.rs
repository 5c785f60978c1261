use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use rdkafka::consumer::Consumer;
use rdkafka::consumer::StreamConsumer;
use rdkafka::error::KafkaError;
use rdkafka::message::BorrowedMessage;
use rdkafka::ClientConfig;
use rdkafka::Message;
use thiserror::Error;
use tokio::sync::watch;

use super::messages::AccountRegisteredMessage;
use crate::config::KafkaConfig;
use crate::domain::notification::errors::NotificationError;
use crate::domain::notification::models::RegistrationEvent;
use crate::domain::notification::ports::NotificationServicePort;

#[derive(Debug, Error)]
pub enum MessageProcessingError {
    #[error("Message has no payload")]
    NoPayload,

    #[error("Failed to decode message payload as UTF-8: {0}")]
    Utf8Error(#[from] std::str::Utf8Error),

    #[error("Failed to deserialize event: {0}")]
    DeserializationError(#[from] serde_json::Error),

    #[error("Failed to handle event: {0}")]
    HandlingError(#[from] NotificationError),
}

/// Decode one record and send its verification email.
///
/// Every failure is final for the record: callers log it and move on.
pub async fn handle_payload<N: NotificationServicePort>(
    notification_service: &N,
    payload: Option<&[u8]>,
) -> Result<(), MessageProcessingError> {
    let payload = payload
        .filter(|bytes| !bytes.is_empty())
        .ok_or(MessageProcessingError::NoPayload)?;
    let json_string = std::str::from_utf8(payload)?;
    let message = serde_json::from_str::<AccountRegisteredMessage>(json_string)?;
    let event = RegistrationEvent::from(message);

    tracing::debug!(
        account_id = %event.account_id,
        event_id = event.event_id.as_deref().unwrap_or("-"),
        "Received registration event"
    );

    notification_service.send_verification(&event).await?;

    Ok(())
}

/// Kafka consumer for registration events from identity-service.
///
/// Offsets are stored after each record whatever the outcome, so a poison record
/// is skipped rather than redelivered forever.
pub struct RegistrationEventsConsumer<N: NotificationServicePort> {
    consumer: StreamConsumer,
    notification_service: Arc<N>,
    topic: String,
}

impl<N: NotificationServicePort> RegistrationEventsConsumer<N> {
    pub fn new(config: &KafkaConfig, notification_service: Arc<N>) -> Result<Self, anyhow::Error> {
        tracing::info!(
            brokers = %config.brokers,
            group_id = %config.group_id,
            topic = %config.topic,
            "Initializing registration events consumer"
        );

        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", &config.brokers)
            .set("group.id", &config.group_id)
            .set("enable.auto.commit", "true")
            .set("auto.commit.interval.ms", "5000")
            // Commit only what we stored, i.e. records we have finished with.
            .set("enable.auto.offset.store", "false")
            .set("auto.offset.reset", "earliest")
            .set("session.timeout.ms", "30000")
            .set("enable.partition.eof", "false")
            .create()?;

        consumer.subscribe(&[&config.topic])?;

        tracing::info!(topic = %config.topic, "Registration events consumer subscribed");

        Ok(Self {
            consumer,
            notification_service,
            topic: config.topic.clone(),
        })
    }

    /// Consume until `shutdown` flips to true or its sender is dropped.
    ///
    /// A record in flight when shutdown is requested is finished first.
    pub async fn start_consuming(self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(topic = %self.topic, "Starting registration events consumer loop");

        let mut message_stream = self.consumer.stream();

        loop {
            if *shutdown.borrow() {
                break;
            }

            tokio::select! {
                biased;

                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }

                next = message_stream.next() => {
                    match next {
                        Some(Ok(message)) => self.process_message(&message).await,
                        Some(Err(error)) => {
                            tracing::error!(error = %error, "Kafka consumer error");
                            tokio::time::sleep(Duration::from_millis(100)).await;
                        }
                        None => break,
                    }
                }
            }
        }

        tracing::info!("Registration events consumer stopped");
    }

    async fn process_message(&self, message: &BorrowedMessage<'_>) {
        let result = handle_payload(self.notification_service.as_ref(), message.payload()).await;

        if let Err(error) = result {
            tracing::error!(
                partition = message.partition(),
                offset = message.offset(),
                error = %error,
                "Dropping registration event"
            );
        }

        if let Err(error) = self.store_offset(message) {
            tracing::warn!(
                partition = message.partition(),
                offset = message.offset(),
                error = %error,
                "Failed to store consumer offset"
            );
        }
    }

    fn store_offset(&self, message: &BorrowedMessage<'_>) -> Result<(), KafkaError> {
        self.consumer.store_offset_from_message(message)
    }
}

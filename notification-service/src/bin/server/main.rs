use std::sync::Arc;

use notification_service::config::Config;
use notification_service::config::EmailTransport;
use notification_service::domain::notification::ports::EmailSender;
use notification_service::domain::notification::service::NotificationService;
use notification_service::inbound::events::RegistrationEventsConsumer;
use notification_service::outbound::email::HttpEmailSender;
use notification_service::outbound::email::LoggingEmailSender;
use tokio::sync::watch;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "notification_service=debug,rdkafka=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "notification-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        kafka_brokers = %config.kafka.brokers,
        kafka_topic = %config.kafka.topic,
        kafka_group_id = %config.kafka.group_id,
        email_transport = ?config.email.transport,
        "Configuration loaded"
    );

    match config.email.transport {
        EmailTransport::Log => run(&config, LoggingEmailSender::new()).await,
        EmailTransport::Http => run(&config, HttpEmailSender::from_config(&config.email)?).await,
    }
}

async fn run<ES: EmailSender>(config: &Config, email_sender: ES) -> Result<(), anyhow::Error> {
    let notification_service = Arc::new(NotificationService::new(Arc::new(email_sender)));
    let consumer = RegistrationEventsConsumer::new(&config.kafka, notification_service)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let consumer_task = tokio::spawn(consumer.start_consuming(shutdown_rx));

    shutdown_signal().await;
    if shutdown_tx.send(true).is_err() {
        tracing::warn!("Consumer already stopped before shutdown");
    }

    consumer_task.await?;
    tracing::info!("Service exited");

    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("Shutdown signal received, stopping consumer"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}

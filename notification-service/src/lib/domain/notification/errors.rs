use thiserror::Error;

/// Failure delivering an email through a sender.
#[derive(Debug, Clone, Error)]
pub enum EmailSendError {
    #[error("Email provider rejected the message with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Email transport failed: {0}")]
    Transport(String),
}

#[derive(Debug, Error)]
pub enum NotificationError {
    #[error("Invalid registration event: {0}")]
    InvalidEvent(String),

    #[error(transparent)]
    Send(#[from] EmailSendError),
}

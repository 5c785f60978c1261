use thiserror::Error;

/// Error type for JWT operations.
///
/// The verification variants exist for server-side logging; callers facing
/// clients should treat all of them as one "invalid token" outcome.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token algorithm does not match the configured algorithm")]
    AlgorithmMismatch,

    #[error("Token is invalid: {0}")]
    InvalidToken(String),
}

use thiserror::Error;

/// Error type for password operations.
///
/// Verification never fails with an error; only hashing can.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),
}

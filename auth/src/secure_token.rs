use rand::rngs::OsRng;
use rand::RngCore;

/// Default token size in bytes (32 bytes = 256 bits of entropy)
pub const DEFAULT_TOKEN_BYTES: usize = 32;

/// Generate a cryptographically secure random token.
///
/// Uses OS-provided entropy. Suitable for single-use links such as email
/// verification.
///
/// # Returns
/// Lowercase hex string, 64 characters long
pub fn generate_secure_token() -> String {
    generate_secure_token_with_size(DEFAULT_TOKEN_BYTES)
}

/// Generate a cryptographically secure random token of `bytes` bytes.
///
/// # Returns
/// Lowercase hex string, `2 * bytes` characters long
pub fn generate_secure_token_with_size(bytes: usize) -> String {
    let mut buffer = vec![0u8; bytes];
    OsRng.fill_bytes(&mut buffer);
    hex::encode(buffer)
}

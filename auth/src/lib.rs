//! Authentication utilities library
//!
//! Provides reusable authentication infrastructure for the services:
//! - Password hashing (Argon2id)
//! - Access token issuance and verification (HS256 JWT)
//! - Random single-use tokens
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("other_password", &hash));
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::{AccountStatus, TokenConfig, TokenSigner};
//!
//! let signer = TokenSigner::new(&TokenConfig {
//!     secret: "secret_key_at_least_32_bytes_long!".to_string(),
//!     issuer: "identity-service".to_string(),
//!     access_ttl: chrono::Duration::minutes(15),
//! });
//! let issued = signer.issue("account-1", "alice@x.com", AccountStatus::Pending).unwrap();
//! let claims = signer.verify(&issued.token).unwrap();
//! assert_eq!(claims.status, AccountStatus::Pending);
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;
pub mod secure_token;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use authenticator::TokenSubject;
pub use jwt::AccessClaims;
pub use jwt::AccountStatus;
pub use jwt::IssuedToken;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenConfig;
pub use jwt::TokenSigner;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use secure_token::generate_secure_token;

use crate::jwt::AccessClaims;
use crate::jwt::AccountStatus;
use crate::jwt::IssuedToken;
use crate::jwt::JwtError;
use crate::jwt::TokenConfig;
use crate::jwt::TokenSigner;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and JWT generation.
///
/// Provides high-level authentication operations by coordinating
/// password hashing and access token signing.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_signer: TokenSigner,
}

/// Identity to embed in an access token after a successful password check.
#[derive(Debug, Clone, Copy)]
pub struct TokenSubject<'a> {
    pub account_id: &'a str,
    pub email: &'a str,
    pub status: AccountStatus,
}

/// Result of successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    pub access_token: String,
    pub token_id: String,
}

impl From<IssuedToken> for AuthenticationResult {
    fn from(issued: IssuedToken) -> Self {
        Self {
            access_token: issued.token,
            token_id: issued.token_id,
        }
    }
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `config` - Signing secret, issuer and access token lifetime
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            token_signer: TokenSigner::new(config),
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and issue an access token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject` - Identity to encode in the token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match (or the hash is corrupt)
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: TokenSubject<'_>,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let issued = self
            .token_signer
            .issue(subject.account_id, subject.email, subject.status)?;

        Ok(issued.into())
    }

    /// Reject a login for an account that does not exist.
    ///
    /// Spends one password verification so the response time matches a
    /// wrong-password attempt on a real account.
    pub fn reject_unknown(&self, password: &str) -> AuthenticationError {
        self.password_hasher.verify_placeholder(password);
        AuthenticationError::InvalidCredentials
    }

    /// Validate and decode an access token.
    ///
    /// # Errors
    /// * `JwtError` - Token validation or decoding failed, or the token expired
    pub fn validate_token(&self, token: &str) -> Result<AccessClaims, JwtError> {
        self.token_signer.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;

    fn authenticator() -> Authenticator {
        Authenticator::new(&TokenConfig {
            secret: "test_secret_key_at_least_32_bytes!".to_string(),
            issuer: "identity-service".to_string(),
            access_ttl: Duration::minutes(15),
        })
    }

    fn subject() -> TokenSubject<'static> {
        TokenSubject {
            account_id: "account123",
            email: "alice@x.com",
            status: AccountStatus::Pending,
        }
    }

    #[test]
    fn test_authenticate_success() {
        let authenticator = authenticator();

        let password = "my_password";
        let hash = authenticator
            .hash_password(password)
            .expect("Failed to hash password");

        let result = authenticator
            .authenticate(password, &hash, subject())
            .expect("Authentication failed");

        assert!(!result.access_token.is_empty());

        let decoded = authenticator
            .validate_token(&result.access_token)
            .expect("Token validation failed");
        assert_eq!(decoded.account_id, "account123");
        assert_eq!(decoded.status, AccountStatus::Pending);
        assert_eq!(decoded.jti, result.token_id);
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = authenticator();

        let hash = authenticator
            .hash_password("my_password")
            .expect("Failed to hash password");

        let result = authenticator.authenticate("wrong_password", &hash, subject());
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_authenticate_corrupt_hash_is_invalid_credentials() {
        let authenticator = authenticator();

        let result = authenticator.authenticate("my_password", "not-a-phc-string", subject());
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_reject_unknown() {
        let authenticator = authenticator();

        assert!(matches!(
            authenticator.reject_unknown("anything"),
            AuthenticationError::InvalidCredentials
        ));
    }

    #[test]
    fn test_validate_invalid_token() {
        let authenticator = authenticator();

        let result = authenticator.validate_token("invalid.token.here");
        assert!(result.is_err());
    }
}

use chrono::DateTime;
use chrono::Duration;
use chrono::SubsecRound;
use chrono::Utc;

use super::claims::AccessClaims;
use super::claims::AccountStatus;
use super::errors::JwtError;
use super::handler::JwtHandler;

/// Signing configuration, built once at startup and handed to `TokenSigner::new`.
#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub secret: String,
    pub issuer: String,
    pub access_ttl: Duration,
}

/// A freshly issued access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub token_id: String,
    pub expires_at: DateTime<Utc>,
}

/// Issues and verifies access tokens.
///
/// Read-only after construction; share it behind an `Arc` without locking.
pub struct TokenSigner {
    handler: JwtHandler,
    issuer: String,
    access_ttl: Duration,
}

impl TokenSigner {
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            handler: JwtHandler::new(config.secret.as_bytes()).with_issuer(&config.issuer),
            issuer: config.issuer.clone(),
            access_ttl: config.access_ttl,
        }
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Issue an access token for an account, valid from now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(
        &self,
        account_id: &str,
        email: &str,
        status: AccountStatus,
    ) -> Result<IssuedToken, JwtError> {
        self.issue_at(account_id, email, status, Utc::now())
    }

    /// Issue an access token as of `now`.
    ///
    /// `now` is truncated to whole seconds so `expires_at` matches the `exp` claim.
    pub fn issue_at(
        &self,
        account_id: &str,
        email: &str,
        status: AccountStatus,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, JwtError> {
        let now = now.trunc_subsecs(0);
        let claims = AccessClaims::new(account_id, email, status, &self.issuer, self.access_ttl, now);
        let token = self.handler.encode(&claims)?;

        Ok(IssuedToken {
            token,
            token_id: claims.jti,
            expires_at: now + self.access_ttl,
        })
    }

    /// Verify a token against the current time.
    pub fn verify(&self, token: &str) -> Result<AccessClaims, JwtError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as of `now`.
    ///
    /// # Errors
    /// * `AlgorithmMismatch` - Token was not signed with HS256
    /// * `InvalidToken` - Bad signature, malformed token, wrong issuer
    /// * `TokenExpired` - `now` is at or past the expiration instant
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<AccessClaims, JwtError> {
        let claims: AccessClaims = self.handler.decode(token)?;

        if claims.exp <= claims.iat {
            return Err(JwtError::InvalidToken(
                "Expiration is not after issuance".to_string(),
            ));
        }

        if claims.is_expired(now.timestamp()) {
            return Err(JwtError::TokenExpired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer(secret: &str) -> TokenSigner {
        TokenSigner::new(&TokenConfig {
            secret: secret.to_string(),
            issuer: "identity-service".to_string(),
            access_ttl: Duration::minutes(15),
        })
    }

    #[test]
    fn test_issue_and_verify() {
        let signer = signer("test_secret_key_at_least_32_bytes!");

        let issued = signer
            .issue("account-1", "alice@x.com", AccountStatus::Pending)
            .expect("Failed to issue token");
        let claims = signer.verify(&issued.token).expect("Failed to verify token");

        assert_eq!(claims.account_id, "account-1");
        assert_eq!(claims.sub, "account-1");
        assert_eq!(claims.email, "alice@x.com");
        assert_eq!(claims.status, AccountStatus::Pending);
        assert_eq!(claims.iss, "identity-service");
        assert_eq!(claims.jti, issued.token_id);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn test_expiry_boundary() {
        let signer = signer("test_secret_key_at_least_32_bytes!");
        let issued_at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let lifetime = signer.access_ttl();

        let issued = signer
            .issue_at("account-1", "alice@x.com", AccountStatus::Active, issued_at)
            .expect("Failed to issue token");
        assert_eq!(issued.expires_at, issued_at + lifetime);

        let just_before = issued_at + lifetime - Duration::seconds(1);
        let at_expiry = issued_at + lifetime;
        let just_after = issued_at + lifetime + Duration::seconds(1);

        assert!(signer.verify_at(&issued.token, just_before).is_ok());
        assert_eq!(
            signer.verify_at(&issued.token, at_expiry),
            Err(JwtError::TokenExpired)
        );
        assert_eq!(
            signer.verify_at(&issued.token, just_after),
            Err(JwtError::TokenExpired)
        );
    }

    #[test]
    fn test_expiry_boundary_with_subsecond_issuance() {
        let signer = signer("test_secret_key_at_least_32_bytes!");
        let issued_at = DateTime::from_timestamp(1_700_000_000, 900_000_000).unwrap();
        let lifetime = signer.access_ttl();

        let issued = signer
            .issue_at("account-1", "alice@x.com", AccountStatus::Active, issued_at)
            .expect("Failed to issue token");
        let whole_second = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        assert_eq!(issued.expires_at, whole_second + lifetime);

        let claims = signer
            .verify_at(&issued.token, issued.expires_at - Duration::milliseconds(500))
            .expect("Token should still be valid before expires_at");
        assert_eq!(claims.exp, issued.expires_at.timestamp());

        assert_eq!(
            signer.verify_at(&issued.token, issued.expires_at),
            Err(JwtError::TokenExpired)
        );
    }

    #[test]
    fn test_verify_with_other_secret_fails() {
        let issuer = signer("secret1_at_least_32_bytes_long_key!");
        let verifier = signer("secret2_at_least_32_bytes_long_key!");

        let issued = issuer
            .issue("account-1", "alice@x.com", AccountStatus::Active)
            .expect("Failed to issue token");

        assert!(matches!(
            verifier.verify(&issued.token),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_verify_tampered_payload_fails() {
        let signer = signer("test_secret_key_at_least_32_bytes!");

        let pending = signer
            .issue("account-1", "alice@x.com", AccountStatus::Pending)
            .expect("Failed to issue token");
        let active = signer
            .issue("account-1", "alice@x.com", AccountStatus::Active)
            .expect("Failed to issue token");

        // Splice the ACTIVE payload onto the PENDING signature.
        let pending_parts: Vec<&str> = pending.token.split('.').collect();
        let active_parts: Vec<&str> = active.token.split('.').collect();
        let forged = format!(
            "{}.{}.{}",
            pending_parts[0], active_parts[1], pending_parts[2]
        );

        assert!(signer.verify(&forged).is_err());
    }

    #[test]
    fn test_verify_malformed_token_fails() {
        let signer = signer("test_secret_key_at_least_32_bytes!");

        assert!(signer.verify("").is_err());
        assert!(signer.verify("not-a-token").is_err());
        assert!(signer.verify("a.b").is_err());
    }

    #[test]
    fn test_independent_instances() {
        let first = signer("first_secret_key_at_least_32_bytes!");
        let second = signer("second_secret_key_at_least_32_bytes");

        let from_first = first
            .issue("account-1", "alice@x.com", AccountStatus::Active)
            .expect("Failed to issue token");
        let from_second = second
            .issue("account-2", "bob@x.com", AccountStatus::Active)
            .expect("Failed to issue token");

        assert!(first.verify(&from_first.token).is_ok());
        assert!(second.verify(&from_second.token).is_ok());
        assert!(first.verify(&from_second.token).is_err());
        assert!(second.verify(&from_first.token).is_err());
    }
}

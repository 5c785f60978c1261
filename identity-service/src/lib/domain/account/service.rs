use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use auth::TokenSubject;

use crate::account::errors::AccountError;
use crate::account::ports::AccountRepository;
use crate::account::ports::AccountServicePort;
use crate::account::ports::EventPublisher;
use crate::domain::account::events::AccountRegisteredEvent;
use crate::domain::account::models::AccessGrant;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::models::RegistrationReceipt;
use crate::domain::account::models::VerificationOutcome;
use crate::domain::account::models::VerificationToken;

/// Domain service implementation for account operations.
///
/// Registration writes the account and then publishes the event as two
/// separate steps; a failed publish leaves a PENDING account whose stored
/// token still works.
pub struct AccountService<AR, EP>
where
    AR: AccountRepository,
    EP: EventPublisher,
{
    repository: Arc<AR>,
    event_publisher: Arc<EP>,
    authenticator: Arc<Authenticator>,
    verification_base_url: String,
}

impl<AR, EP> AccountService<AR, EP>
where
    AR: AccountRepository,
    EP: EventPublisher,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Account persistence implementation
    /// * `event_publisher` - Domain event publishing implementation
    /// * `authenticator` - Password hashing and token issuance
    /// * `verification_base_url` - Base URL embedded in verification links
    pub fn new(
        repository: Arc<AR>,
        event_publisher: Arc<EP>,
        authenticator: Arc<Authenticator>,
        verification_base_url: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
            authenticator,
            verification_base_url: verification_base_url.into(),
        }
    }

    fn reject_login(&self, password: &str) -> AccountError {
        self.authenticator.reject_unknown(password);
        AccountError::InvalidCredentials
    }
}

#[async_trait]
impl<AR, EP> AccountServicePort for AccountService<AR, EP>
where
    AR: AccountRepository,
    EP: EventPublisher,
{
    async fn register(&self, command: RegisterCommand) -> Result<RegistrationReceipt, AccountError> {
        let password_hash = self
            .authenticator
            .hash_password(command.password.as_str())
            .map_err(|e| AccountError::Internal(format!("Password hashing failed: {}", e)))?;

        let token = VerificationToken::generate();
        let account = Account::new_pending(
            command.name,
            command.surname,
            command.email,
            password_hash,
            token.clone(),
        );

        let created = self.repository.create(account).await?;
        tracing::info!(
            account_id = %created.id,
            email = %created.email,
            "Account registered"
        );

        let event = AccountRegisteredEvent::new(&created, &token, &self.verification_base_url);
        if let Err(e) = self.event_publisher.publish_account_registered(&event).await {
            tracing::error!(
                account_id = %created.id,
                email = %created.email,
                error = %e,
                "Failed to publish AccountRegistered event, account stays pending"
            );
        }

        Ok(RegistrationReceipt {
            account_id: created.id,
            status: created.status,
        })
    }

    async fn login(&self, command: LoginCommand) -> Result<AccessGrant, AccountError> {
        let Ok(email) = EmailAddress::new(command.email) else {
            tracing::debug!("Login rejected: malformed email");
            return Err(self.reject_login(&command.password));
        };

        let Some(account) = self.repository.find_by_email(&email).await? else {
            tracing::debug!(email = %email, "Login rejected: unknown email");
            return Err(self.reject_login(&command.password));
        };

        let account_id = account.id.to_string();
        let subject = TokenSubject {
            account_id: &account_id,
            email: account.email.as_str(),
            status: account.status,
        };

        let result = self
            .authenticator
            .authenticate(&command.password, &account.password_hash, subject)
            .map_err(|e| match e {
                AuthenticationError::InvalidCredentials => {
                    tracing::debug!(account_id = %account.id, "Login rejected: wrong password");
                    AccountError::InvalidCredentials
                }
                AuthenticationError::JwtError(err) => {
                    AccountError::Internal(format!("Token generation failed: {}", err))
                }
            })?;

        tracing::info!(
            account_id = %account.id,
            status = %account.status,
            token_id = %result.token_id,
            "Access token issued"
        );

        Ok(AccessGrant {
            access_token: result.access_token,
            token_id: result.token_id,
            account_id: account.id,
            email: account.email,
        })
    }

    async fn verify_email(&self, token: &str) -> Result<VerificationOutcome, AccountError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AccountError::InvalidOrExpiredToken);
        }

        let Some(account) = self.repository.find_by_verification_token(token).await? else {
            tracing::warn!("Verification attempted with unknown token");
            return Err(AccountError::InvalidOrExpiredToken);
        };

        if account.is_active() {
            tracing::debug!(account_id = %account.id, "Verification link reused");
            return Ok(VerificationOutcome::AlreadyActive(account.id));
        }

        // Lost race with a concurrent activation counts as already active.
        if self.repository.activate(&account.id).await? {
            tracing::info!(account_id = %account.id, "Account activated");
            Ok(VerificationOutcome::Activated(account.id))
        } else {
            Ok(VerificationOutcome::AlreadyActive(account.id))
        }
    }

    async fn get_account(&self, id: &AccountId) -> Result<Account, AccountError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AccountError::NotFound(id.to_string()))
    }
}

use async_trait::async_trait;

use crate::account::errors::AccountError;
use crate::account::errors::EventPublisherError;
use crate::domain::account::events::AccountRegisteredEvent;
use crate::domain::account::models::AccessGrant;
use crate::domain::account::models::Account;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::EmailAddress;
use crate::domain::account::models::LoginCommand;
use crate::domain::account::models::RegisterCommand;
use crate::domain::account::models::RegistrationReceipt;
use crate::domain::account::models::VerificationOutcome;

/// Port for account domain service operations.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new account in PENDING state and announce it.
    ///
    /// # Arguments
    /// * `command` - Validated name, surname, email and password
    ///
    /// # Returns
    /// Identifier and status of the new account
    ///
    /// # Errors
    /// * `EmailTaken` - Email is already registered
    /// * `Database` - Database operation failed
    /// * `Internal` - Hashing failed or a token collided
    async fn register(&self, command: RegisterCommand) -> Result<RegistrationReceipt, AccountError>;

    /// Check credentials and issue an access token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password, indistinguishably
    /// * `Database` - Database operation failed
    /// * `Internal` - Token issuance failed
    async fn login(&self, command: LoginCommand) -> Result<AccessGrant, AccountError>;

    /// Consume a verification token.
    ///
    /// # Returns
    /// `Activated` on the first use, `AlreadyActive` afterwards
    ///
    /// # Errors
    /// * `InvalidOrExpiredToken` - No account was ever issued this token
    /// * `Database` - Database operation failed
    async fn verify_email(&self, token: &str) -> Result<VerificationOutcome, AccountError>;

    /// Retrieve account by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `Database` - Database operation failed
    async fn get_account(&self, id: &AccountId) -> Result<Account, AccountError>;
}

/// Persistence operations for the account aggregate.
#[async_trait]
pub trait AccountRepository: Send + Sync + 'static {
    /// Persist a new account.
    ///
    /// Email uniqueness is enforced here, atomically with the insert.
    ///
    /// # Errors
    /// * `EmailTaken` - Email is already registered
    /// * `Internal` - Verification token collided with an existing one
    /// * `Database` - Database operation failed
    async fn create(&self, account: Account) -> Result<Account, AccountError>;

    /// Retrieve account by identifier.
    ///
    /// # Returns
    /// Optional account entity (None if not found)
    async fn find_by_id(&self, id: &AccountId) -> Result<Option<Account>, AccountError>;

    /// Retrieve account by normalized email address.
    ///
    /// # Returns
    /// Optional account entity (None if not found)
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<Account>, AccountError>;

    /// Retrieve account holding this verification token, consumed or not.
    ///
    /// # Returns
    /// Optional account entity (None if the token was never issued)
    async fn find_by_verification_token(
        &self,
        token: &str,
    ) -> Result<Option<Account>, AccountError>;

    /// Move an account from PENDING to ACTIVE.
    ///
    /// Idempotent: an already ACTIVE account is left untouched.
    ///
    /// # Returns
    /// True if this call performed the transition
    ///
    /// # Errors
    /// * `NotFound` - Account does not exist
    /// * `Database` - Database operation failed
    async fn activate(&self, id: &AccountId) -> Result<bool, AccountError>;
}

/// Event publishing for domain events.
#[async_trait]
pub trait EventPublisher: Send + Sync + 'static {
    /// Publish account registration event, keyed by recipient email.
    ///
    /// # Errors
    /// * `SerializationFailed` - Event serialization failed
    /// * `PublishFailed` - Failed to publish to broker
    async fn publish_account_registered(
        &self,
        event: &AccountRegisteredEvent,
    ) -> Result<(), EventPublisherError>;
}

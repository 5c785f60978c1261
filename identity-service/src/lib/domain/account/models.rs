use std::fmt;
use std::str::FromStr;

pub use auth::AccountStatus;
use chrono::DateTime;
use chrono::Utc;
use uuid::Uuid;

use crate::account::errors::AccountIdError;
use crate::account::errors::EmailError;
use crate::account::errors::NameError;
use crate::account::errors::PasswordPolicyError;

/// Account aggregate entity.
///
/// Created PENDING with an outstanding verification token; the only
/// transition is PENDING to ACTIVE.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: AccountId,
    pub name: PersonName,
    pub surname: PersonName,
    pub email: EmailAddress,
    pub password_hash: String,
    pub status: AccountStatus,
    /// Kept after activation as a consumed marker, so a replayed link resolves
    /// to "already active" instead of "invalid".
    pub verification_token: Option<VerificationToken>,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new pending account.
    ///
    /// # Arguments
    /// * `name` - Validated first name
    /// * `surname` - Validated surname
    /// * `email` - Normalized email address
    /// * `password_hash` - PHC string of the hashed password
    /// * `verification_token` - Freshly minted single-use token
    pub fn new_pending(
        name: PersonName,
        surname: PersonName,
        email: EmailAddress,
        password_hash: String,
        verification_token: VerificationToken,
    ) -> Self {
        let now = Utc::now();

        Self {
            id: AccountId::new(),
            name,
            surname,
            email,
            password_hash,
            status: AccountStatus::Pending,
            verification_token: Some(verification_token),
            verified_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Name shown in greetings ("Alice Doe").
    pub fn display_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// Account unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(pub Uuid);

impl AccountId {
    /// Generate a new random account ID.
    ///
    /// # Returns
    /// AccountId with random UUID v4
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an account ID from string.
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid UUID
    pub fn from_string(s: &str) -> Result<Self, AccountIdError> {
        Uuid::parse_str(s)
            .map(AccountId)
            .map_err(|e| AccountIdError::InvalidFormat(e.to_string()))
    }
}

impl Default for AccountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// First name or surname.
///
/// Trimmed; non-empty and at most 255 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonName(String);

impl PersonName {
    const MAX_LENGTH: usize = 255;

    /// Create a validated name.
    ///
    /// # Errors
    /// * `Empty` - Nothing left after trimming whitespace
    /// * `TooLong` - More than 255 characters
    pub fn new(name: String) -> Result<Self, NameError> {
        let name = name.trim();
        let length = name.chars().count();

        if length == 0 {
            Err(NameError::Empty)
        } else if length > Self::MAX_LENGTH {
            Err(NameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(Self(name.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersonName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser and normalizes to
/// lowercase, so uniqueness and login lookup are case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    const MAX_LENGTH: usize = 255;

    /// Create a new validated, normalized email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    /// * `TooLong` - More than 255 characters
    pub fn new(email: String) -> Result<Self, EmailError> {
        let email = email.trim().to_lowercase();

        if email.len() > Self::MAX_LENGTH {
            return Err(EmailError::TooLong {
                max: Self::MAX_LENGTH,
                actual: email.len(),
            });
        }

        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Get email as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Plaintext password that satisfies the registration policy.
///
/// Never printed: `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(String);

impl Password {
    const MIN_LENGTH: usize = 8;

    /// # Errors
    /// * `TooShort` - Fewer than 8 characters
    pub fn new(password: String) -> Result<Self, PasswordPolicyError> {
        let length = password.chars().count();
        if length < Self::MIN_LENGTH {
            return Err(PasswordPolicyError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            });
        }

        Ok(Self(password))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Single-use email verification token (64 hex characters).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VerificationToken(String);

impl VerificationToken {
    /// Mint a token from the OS random number generator.
    pub fn generate() -> Self {
        Self(auth::generate_secure_token())
    }

    /// Wrap a token read back from storage.
    pub fn from_stored(token: String) -> Self {
        Self(token)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Command to register a new account with domain types
#[derive(Debug)]
pub struct RegisterCommand {
    pub name: PersonName,
    pub surname: PersonName,
    pub email: EmailAddress,
    pub password: Password,
}

impl RegisterCommand {
    pub fn new(
        name: PersonName,
        surname: PersonName,
        email: EmailAddress,
        password: Password,
    ) -> Self {
        Self {
            name,
            surname,
            email,
            password,
        }
    }
}

/// Login attempt as submitted.
///
/// Left unvalidated: a malformed email is reported as invalid credentials.
#[derive(Clone)]
pub struct LoginCommand {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCommand")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Result of a successful registration. Never carries a session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationReceipt {
    pub account_id: AccountId,
    pub status: AccountStatus,
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    pub access_token: String,
    pub token_id: String,
    pub account_id: AccountId,
    pub email: EmailAddress,
}

/// Outcome of following a verification link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// This call moved the account from PENDING to ACTIVE.
    Activated(AccountId),
    /// The account was already ACTIVE; nothing changed.
    AlreadyActive(AccountId),
}

use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// Lifecycle status of an account, as carried inside access tokens.
///
/// `Pending` accounts may log in; operations gated as "requires active
/// account" must check for `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    Pending,
    Active,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Pending => "PENDING",
            AccountStatus::Active => "ACTIVE",
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, AccountStatus::Active)
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(AccountStatus::Pending),
            "ACTIVE" => Ok(AccountStatus::Active),
            other => Err(format!("Unknown account status: {}", other)),
        }
    }
}

/// Claims of an access token.
///
/// Standard RFC 7519 fields are all mandatory here; `exp` is always
/// `iat` plus the configured access lifetime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessClaims {
    /// Subject (account identifier)
    pub sub: String,

    /// Issuer
    pub iss: String,

    /// JWT ID (unique token identifier)
    pub jti: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    pub account_id: String,
    pub email: String,
    pub status: AccountStatus,
}

impl AccessClaims {
    /// Create claims for an account, issued at `now` and valid for `lifetime`.
    ///
    /// # Arguments
    /// * `account_id` - Unique account identifier (also used as subject)
    /// * `email` - Account email address
    /// * `status` - Account status at issuance
    /// * `issuer` - Issuer name
    /// * `lifetime` - Access token lifetime
    /// * `now` - Issuance instant
    pub fn new(
        account_id: impl ToString,
        email: impl ToString,
        status: AccountStatus,
        issuer: impl ToString,
        lifetime: Duration,
        now: DateTime<Utc>,
    ) -> Self {
        let account_id = account_id.to_string();
        let expiration = now + lifetime;

        Self {
            sub: account_id.clone(),
            iss: issuer.to_string(),
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
            account_id,
            email: email.to_string(),
            status,
        }
    }

    /// Check if token is expired.
    ///
    /// A token is expired from its expiration instant onwards, with no grace window.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }

    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

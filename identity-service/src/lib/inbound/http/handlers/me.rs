use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::account::models::Account;
use crate::domain::account::ports::AccountServicePort;
use crate::inbound::http::middleware::AuthenticatedAccount;
use crate::inbound::http::router::AppState;

/// Profile of the account the bearer token was issued to.
pub async fn get_me<S: AccountServicePort>(
    State(state): State<AppState<S>>,
    Extension(authenticated): Extension<AuthenticatedAccount>,
) -> Result<ApiSuccess<AccountResponseData>, ApiError> {
    state
        .account_service
        .get_account(&authenticated.account_id)
        .await
        .map_err(ApiError::from)
        .map(|ref account| ApiSuccess::new(StatusCode::OK, account.into()))
}

/// Echo of the token claims; only reachable with an ACTIVE token.
pub async fn get_me_active(
    Extension(authenticated): Extension<AuthenticatedAccount>,
) -> ApiSuccess<TokenIdentityData> {
    ApiSuccess::new(StatusCode::OK, (&authenticated).into())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountResponseData {
    pub account_id: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub status: String,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&Account> for AccountResponseData {
    fn from(account: &Account) -> Self {
        Self {
            account_id: account.id.to_string(),
            name: account.name.as_str().to_string(),
            surname: account.surname.as_str().to_string(),
            email: account.email.as_str().to_string(),
            status: account.status.to_string(),
            verified_at: account.verified_at,
            created_at: account.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenIdentityData {
    pub account_id: String,
    pub email: String,
    pub status: String,
    pub expires_at: i64,
}

impl From<&AuthenticatedAccount> for TokenIdentityData {
    fn from(authenticated: &AuthenticatedAccount) -> Self {
        Self {
            account_id: authenticated.account_id.to_string(),
            email: authenticated.email.clone(),
            status: authenticated.status.to_string(),
            expires_at: authenticated.expires_at,
        }
    }
}

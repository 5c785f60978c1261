use axum::extract::Query;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use super::INVALID_TOKEN_MESSAGE;
use crate::domain::account::models::AccountStatus;
use crate::domain::account::models::VerificationOutcome;
use crate::domain::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

/// Target of the link in the verification email.
///
/// Both a first click and a repeated click answer 200; only a token that was
/// never issued is rejected.
pub async fn verify_email<S: AccountServicePort>(
    State(state): State<AppState<S>>,
    Query(params): Query<VerifyEmailParams>,
) -> Result<ApiSuccess<VerifyEmailResponseData>, ApiError> {
    let token = params
        .token
        .ok_or_else(|| ApiError::BadRequest(INVALID_TOKEN_MESSAGE.to_string()))?;

    state
        .account_service
        .verify_email(&token)
        .await
        .map_err(ApiError::from)
        .map(|outcome| ApiSuccess::new(StatusCode::OK, outcome.into()))
}

#[derive(Debug, Clone, Deserialize)]
pub struct VerifyEmailParams {
    token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerifyEmailResponseData {
    pub message: String,
    pub status: String,
}

impl From<VerificationOutcome> for VerifyEmailResponseData {
    fn from(outcome: VerificationOutcome) -> Self {
        let message = match outcome {
            VerificationOutcome::Activated(_) => "Email verified. Your account is now active.",
            VerificationOutcome::AlreadyActive(_) => "Account is already active.",
        };

        Self {
            message: message.to_string(),
            status: AccountStatus::Active.to_string(),
        }
    }
}

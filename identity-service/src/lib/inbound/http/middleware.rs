use axum::extract::Request;
use axum::extract::State;
use axum::http;
use axum::middleware::Next;
use axum::response::Response;

use super::handlers::ApiError;
use super::handlers::INVALID_TOKEN_MESSAGE;
use crate::domain::account::models::AccountId;
use crate::domain::account::models::AccountStatus;
use crate::domain::account::ports::AccountServicePort;
use crate::inbound::http::router::AppState;

/// Extension type to store the authenticated account in request extensions
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount {
    pub account_id: AccountId,
    pub email: String,
    pub status: AccountStatus,
    pub expires_at: i64,
}

/// Middleware that validates JWT tokens and adds account info to request extensions
///
/// Every failure answers 401 with the same message; the reason is only logged.
pub async fn authenticate<S: AccountServicePort>(
    State(state): State<AppState<S>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_token_from_header(&req)?;

    let claims = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "JWT validation failed");
        unauthorized()
    })?;

    let account_id = AccountId::from_string(&claims.account_id).map_err(|e| {
        tracing::warn!(error = %e, "Failed to parse account ID from token");
        unauthorized()
    })?;

    req.extensions_mut().insert(AuthenticatedAccount {
        account_id,
        email: claims.email,
        status: claims.status,
        expires_at: claims.exp,
    });

    Ok(next.run(req).await)
}

/// Middleware for routes that require an ACTIVE account.
///
/// Layer it inside `authenticate`; a PENDING token gets 403.
pub async fn require_active(req: Request, next: Next) -> Result<Response, ApiError> {
    let Some(account) = req.extensions().get::<AuthenticatedAccount>() else {
        tracing::error!("require_active used without authenticate");
        return Err(unauthorized());
    };

    if !account.status.is_active() {
        tracing::debug!(
            account_id = %account.account_id,
            status = %account.status,
            "Rejected request from non-active account"
        );
        return Err(ApiError::Forbidden(
            "Account must be verified before using this resource".to_string(),
        ));
    }

    Ok(next.run(req).await)
}

fn unauthorized() -> ApiError {
    ApiError::Unauthorized(INVALID_TOKEN_MESSAGE.to_string())
}

fn extract_token_from_header(req: &Request) -> Result<&str, ApiError> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| {
            tracing::debug!("Missing Authorization header");
            unauthorized()
        })?;

    let auth_str = auth_header.to_str().map_err(|_| {
        tracing::debug!("Authorization header is not valid ASCII");
        unauthorized()
    })?;

    auth_str
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            tracing::debug!("Authorization header is not a bearer token");
            unauthorized()
        })
}

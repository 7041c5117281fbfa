//! Authentication API endpoints.
//!
//! Registration creates the local account; credentials and the login
//! flow itself are Keycloak's. Login/logout and the password-reset pair
//! are delegating endpoints; clients talk to the realm directly.

use std::sync::Arc;

use account_store::AccountStore;
use axum::{extract::State, Extension, Json};

use crate::api::dto::{
    LoginInfoResponse, MessageResponse, PasswordResetConfirmRequest, PasswordResetRequest,
    RegisterRequest, RegisterResponse,
};
use crate::error::{ServerError, ServerResult};
use crate::middleware::AuthenticatedUser;
use crate::services::identity;
use crate::state::AppState;

/// Minimum accepted password length, matching the realm policy.
const MIN_PASSWORD_LEN: usize = 8;

/// Registers a new user.
pub async fn register<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
    Json(request): Json<RegisterRequest>,
) -> ServerResult<(axum::http::StatusCode, Json<RegisterResponse>)> {
    if request.password.len() < MIN_PASSWORD_LEN {
        return Err(ServerError::InvalidRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    let account = identity::register(&state.store, &request.email, &request.display_name).await?;

    Ok((
        axum::http::StatusCode::CREATED,
        Json(RegisterResponse {
            id: account.id(),
            email: account.email().to_string(),
            display_name: account.profile().display_name().to_string(),
            message: "User registered successfully. Please verify your email.".to_string(),
        }),
    ))
}

/// Returns login flow information pointing at the realm.
pub async fn login<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
) -> ServerResult<Json<LoginInfoResponse>> {
    Ok(Json(LoginInfoResponse {
        keycloak_url: state.config.keycloak_auth_url(),
        message: "Redirect to Keycloak for authentication".to_string(),
    }))
}

/// Requests a password reset email.
///
/// Token generation and the email itself are Keycloak's; the response is
/// the same whether or not the address is known, so the endpoint cannot
/// be used to enumerate accounts.
pub async fn password_reset(
    Json(request): Json<PasswordResetRequest>,
) -> ServerResult<(axum::http::StatusCode, Json<MessageResponse>)> {
    ::identity::Email::new(request.email)?;

    tracing::info!("Password reset requested");

    Ok((
        axum::http::StatusCode::ACCEPTED,
        Json(MessageResponse {
            message: "If email exists, password reset link has been sent".to_string(),
        }),
    ))
}

/// Confirms a password reset with the emailed token.
///
/// Token validation and the credential update happen in Keycloak; only
/// shape checks happen here.
pub async fn password_reset_confirm(
    Json(request): Json<PasswordResetConfirmRequest>,
) -> ServerResult<Json<MessageResponse>> {
    if request.token.trim().is_empty() {
        return Err(ServerError::InvalidRequest(
            "Reset token is required".to_string(),
        ));
    }
    if request.new_password.len() < MIN_PASSWORD_LEN {
        return Err(ServerError::InvalidRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }

    Ok(Json(MessageResponse {
        message: "Password reset successfully".to_string(),
    }))
}

/// Logs out the current user. Token revocation is delegated to Keycloak.
pub async fn logout<S: AccountStore>(
    State(_state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ServerResult<Json<MessageResponse>> {
    tracing::info!(account_id = %user.id, "User logged out");

    Ok(Json(MessageResponse {
        message: "Logged out successfully".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_password_reset_returns_accepted() {
        let (status, body) = password_reset(Json(PasswordResetRequest {
            email: "alice@example.com".to_string(),
        }))
        .await
        .unwrap();

        assert_eq!(status, StatusCode::ACCEPTED);
        assert_eq!(body.0.message, "If email exists, password reset link has been sent");
    }

    #[tokio::test]
    async fn test_password_reset_rejects_invalid_email() {
        let result = password_reset(Json(PasswordResetRequest {
            email: "not-an-email".to_string(),
        }))
        .await;

        assert!(matches!(result, Err(ServerError::Validation(_))));
    }

    #[tokio::test]
    async fn test_password_reset_confirm_shape_checks() {
        let result = password_reset_confirm(Json(PasswordResetConfirmRequest {
            token: "   ".to_string(),
            new_password: "long-enough-pass".to_string(),
        }))
        .await;
        assert!(matches!(result, Err(ServerError::InvalidRequest(_))));

        let result = password_reset_confirm(Json(PasswordResetConfirmRequest {
            token: "reset-token".to_string(),
            new_password: "short".to_string(),
        }))
        .await;
        assert!(matches!(result, Err(ServerError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_password_reset_confirm_acknowledges() {
        let body = password_reset_confirm(Json(PasswordResetConfirmRequest {
            token: "reset-token".to_string(),
            new_password: "long-enough-pass".to_string(),
        }))
        .await
        .unwrap();

        assert_eq!(body.0.message, "Password reset successfully");
    }
}

//! User profile and admin API endpoints.

use std::sync::Arc;

use account_store::AccountStore;
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::api::dto::{StatsResponse, UpdateProfileRequest, UserProfileResponse};
use crate::error::{ServerError, ServerResult};
use crate::middleware::AuthenticatedUser;
use crate::services::identity;
use crate::state::AppState;

/// Gets the current user's profile.
pub async fn get_me<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ServerResult<Json<UserProfileResponse>> {
    let account = identity::current_profile(&state.store, user.id).await?;
    Ok(Json(UserProfileResponse::from_account(&account)))
}

/// Updates the current user's profile.
///
/// Email and roles are not updatable here; both are owned by Keycloak.
pub async fn update_me<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<UpdateProfileRequest>,
) -> ServerResult<Json<UserProfileResponse>> {
    let account = identity::update_profile(
        &state.store,
        user.id,
        &request.display_name,
        request.location.as_deref(),
        request.avatar_url.as_deref(),
    )
    .await?;

    Ok(Json(UserProfileResponse::from_account(&account)))
}

fn require_admin(user: &AuthenticatedUser) -> ServerResult<()> {
    if !user.is_admin() {
        return Err(ServerError::PermissionDenied(
            "Admin role required".to_string(),
        ));
    }
    Ok(())
}

/// Deactivates an account. Admin only; reversible.
pub async fn deactivate_user<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> ServerResult<Json<UserProfileResponse>> {
    require_admin(&user)?;
    let account = identity::set_active(&state.store, id, false).await?;
    Ok(Json(UserProfileResponse::from_account(&account)))
}

/// Reactivates an account. Admin only.
pub async fn activate_user<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> ServerResult<Json<UserProfileResponse>> {
    require_admin(&user)?;
    let account = identity::set_active(&state.store, id, true).await?;
    Ok(Json(UserProfileResponse::from_account(&account)))
}

/// Returns active account statistics. Admin only.
pub async fn stats<S: AccountStore>(
    State(state): State<Arc<AppState<S>>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ServerResult<Json<StatsResponse>> {
    require_admin(&user)?;
    let active_accounts = identity::active_count(&state.store).await?;
    Ok(Json(StatsResponse { active_accounts }))
}

//! API endpoints.

pub mod auth;
pub mod dto;
pub mod users;

use std::sync::Arc;

use account_store::AccountStore;
use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;

/// Creates the router for routes that require a verified bearer token.
pub fn protected_router<S: AccountStore + 'static>() -> Router<Arc<AppState<S>>> {
    Router::new()
        // Profile endpoints
        .route("/api/v1/users/me", get(users::get_me))
        .route("/api/v1/users/me", put(users::update_me))
        // Admin endpoints
        .route(
            "/api/v1/admin/users/:id/deactivate",
            post(users::deactivate_user),
        )
        .route(
            "/api/v1/admin/users/:id/activate",
            post(users::activate_user),
        )
        .route("/api/v1/admin/stats", get(users::stats))
        // Auth endpoints
        .route("/api/v1/auth/logout", post(auth::logout))
}

/// Creates the router for routes that work without a token.
pub fn public_router<S: AccountStore + 'static>() -> Router<Arc<AppState<S>>> {
    Router::new()
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/password-reset", post(auth::password_reset))
        .route(
            "/api/v1/auth/password-reset/confirm",
            post(auth::password_reset_confirm),
        )
        .route("/health", get(health_check))
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

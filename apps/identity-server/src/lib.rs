//! BookCycle Identity Server
//!
//! HTTP backend for the identity bounded context. Keycloak owns
//! credentials and role issuance; this server verifies realm-issued
//! bearer tokens, keeps a local profile per user, and mirrors each
//! user's roles on every authentication.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;

use std::sync::Arc;

use account_store::AccountStore;
use auth::TokenVerifier;
use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::state::{create_shared_state, AppState};

/// Creates the application router with all routes configured.
pub fn create_app<S: AccountStore + 'static>(state: Arc<AppState<S>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let protected = api::protected_router().layer(axum::middleware::from_fn_with_state(
        state.clone(),
        middleware::auth_middleware::<S>,
    ));

    api::public_router()
        .merge(protected)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Creates the application state with the given configuration and store.
pub fn create_state<S: AccountStore>(
    config: Config,
    store: S,
) -> anyhow::Result<Arc<AppState<S>>> {
    let issuer = config.keycloak_issuer_url.clone();
    let verifier = if let Some(pem) = &config.jwt_public_key {
        TokenVerifier::from_rsa_pem(pem.as_bytes(), &issuer)
            .map_err(|e| anyhow::anyhow!("Invalid BOOKCYCLE_JWT_PUBLIC_KEY: {e}"))?
    } else if let Some(secret) = &config.jwt_secret {
        tracing::warn!("Using HMAC token verification; intended for dev setups only");
        TokenVerifier::from_hmac_secret(secret, &issuer)
    } else {
        anyhow::bail!("No token verification key configured");
    };

    Ok(create_shared_state(config, store, verifier))
}

/// Initializes tracing with the given log level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

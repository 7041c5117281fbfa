//! Application state.

use std::sync::Arc;

use account_store::AccountStore;
use auth::TokenVerifier;

use crate::config::Config;

/// Shared application state.
pub struct AppState<S: AccountStore> {
    /// Server configuration.
    pub config: Config,
    /// Account store.
    pub store: S,
    /// Bearer-token verifier for the Keycloak realm.
    pub verifier: TokenVerifier,
}

impl<S: AccountStore> AppState<S> {
    /// Creates new application state.
    pub fn new(config: Config, store: S, verifier: TokenVerifier) -> Self {
        Self {
            config,
            store,
            verifier,
        }
    }
}

/// Type alias for shared state.
pub type SharedState<S> = Arc<AppState<S>>;

/// Creates shared state from config, store, and verifier.
pub fn create_shared_state<S: AccountStore>(
    config: Config,
    store: S,
    verifier: TokenVerifier,
) -> SharedState<S> {
    Arc::new(AppState::new(config, store, verifier))
}

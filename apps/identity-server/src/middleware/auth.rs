//! Authentication middleware.
//!
//! Every protected request passes through here: the bearer token is
//! verified against the realm, the `roles` claim is converted to
//! authorities, and the asserted identity is synchronized into the local
//! store before the handler runs. Handlers read the principal from
//! request extensions.

use std::collections::HashSet;
use std::sync::Arc;

use account_store::AccountStore;
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::error::ServerError;
use crate::services::identity;
use crate::state::AppState;

/// The authenticated principal attached to each request.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    /// Provider subject id.
    pub id: Uuid,
    /// Email as asserted by the token.
    pub email: String,
    /// Display name after fallbacks.
    pub display_name: String,
    /// Authorities converted from the token's role claims.
    pub authorities: HashSet<String>,
}

impl AuthenticatedUser {
    /// Returns true if the principal holds the given authority.
    pub fn has_authority(&self, authority: &str) -> bool {
        self.authorities.contains(authority)
    }

    /// Returns true if the principal holds `ROLE_ADMIN`.
    pub fn is_admin(&self) -> bool {
        self.has_authority(auth::ROLE_ADMIN)
    }
}

/// Extracts the bearer token from the Authorization header.
fn extract_token(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
}

/// Authentication middleware.
///
/// Rejects requests without a valid token. A synchronization failure
/// (e.g. an email collision between two distinct subjects) rejects the
/// request too; it is surfaced, never swallowed.
pub async fn auth_middleware<S: AccountStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match extract_token(&request) {
        Some(token) => token,
        None => return ServerError::AuthenticationRequired.into_response(),
    };

    let claims = match state.verifier.verify(token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::debug!(error = %e, "Token verification failed");
            return ServerError::Auth(e).into_response();
        }
    };

    let authorities = auth::authorities_from_claims(&claims);

    let asserted = match claims.asserted_identity() {
        Ok(asserted) => asserted,
        Err(e) => return ServerError::Auth(e).into_response(),
    };

    // Reconcile the external identity with the local aggregate on every
    // authentication event.
    if let Err(e) = identity::synchronize(&state.store, &asserted).await {
        tracing::warn!(subject = %asserted.id, error = %e, "Identity synchronization failed");
        return e.into_response();
    }

    request.extensions_mut().insert(AuthenticatedUser {
        id: asserted.id,
        email: asserted.email,
        display_name: asserted.display_name,
        authorities,
    });

    next.run(request).await
}

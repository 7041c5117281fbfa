//! Identity use cases: registration, synchronization, profile management.
//!
//! These orchestrate the `UserAccount` aggregate against the account
//! store. No retries happen here; conflicts and lookup failures are
//! reported upward for the handler layer to translate.

use std::collections::HashSet;

use account_store::AccountStore;
use auth::AssertedIdentity;
use identity::{AvatarUrl, DisplayName, Email, Location, UserAccount, UserRole};
use uuid::Uuid;

use crate::error::{ServerError, ServerResult};

/// Registers a new account with the default Member role.
///
/// The id is minted where the Keycloak Admin API call would normally
/// return the provider's subject id for the freshly created user.
/// Fails with `DuplicateEmail` if the email is already taken.
pub async fn register<S: AccountStore>(
    store: &S,
    email: &str,
    display_name: &str,
) -> ServerResult<UserAccount> {
    let email = Email::new(email)?;
    let display_name = DisplayName::new(display_name)?;

    ensure_email_free(store, &email, None).await?;

    let account = UserAccount::create(Uuid::new_v4(), email, display_name);
    let account = store.insert(account).await?;

    tracing::info!(account_id = %account.id(), "Account registered");

    Ok(account)
}

/// Reconciles the asserted external identity with the local aggregate.
///
/// Called on every authentication event. Lookup is by external id (the
/// provider's permanent subject), never by email, which is mutable
/// metadata. Known accounts get an authoritative role replacement;
/// unknown accounts go through the registration path seeded from the
/// assertion. An email collision with a differently-keyed account is a
/// conflict and is surfaced, not resolved here.
pub async fn synchronize<S: AccountStore>(
    store: &S,
    asserted: &AssertedIdentity,
) -> ServerResult<UserAccount> {
    let roles: HashSet<UserRole> = asserted
        .roles
        .iter()
        .map(|name| UserRole::from_claim(name))
        .collect();

    if let Some(mut account) = store.find_by_id_any(asserted.id).await? {
        account.synchronize_roles(roles);
        let account = store.save(account).await?;
        tracing::debug!(account_id = %account.id(), roles = ?account.roles(), "Roles synchronized");
        return Ok(account);
    }

    // First appearance of this subject at the backend.
    let email = Email::new(&asserted.email)?;
    let display_name = DisplayName::new(&asserted.display_name)?;

    ensure_email_free(store, &email, Some(asserted.id)).await?;

    // No internal retry: losing a creation race for the same subject
    // surfaces as a conflict and the caller decides what to do with the
    // request.
    let account = UserAccount::from_external_token(asserted.id, email, display_name, roles);
    let account = store.insert(account).await?;

    tracing::info!(account_id = %account.id(), "Account created from token assertion");

    Ok(account)
}

/// Gets the profile of an active account.
pub async fn current_profile<S: AccountStore>(store: &S, id: Uuid) -> ServerResult<UserAccount> {
    store
        .find_by_id(id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("User not found: {id}")))
}

/// Updates profile data.
///
/// Display name is required; location and avatar URL replace the stored
/// value only when supplied non-empty.
pub async fn update_profile<S: AccountStore>(
    store: &S,
    id: Uuid,
    display_name: &str,
    location: Option<&str>,
    avatar_url: Option<&str>,
) -> ServerResult<UserAccount> {
    let display_name = DisplayName::new(display_name)?;
    let location = location
        .filter(|s| !s.is_empty())
        .map(Location::new)
        .transpose()?;
    let avatar_url = avatar_url
        .filter(|s| !s.is_empty())
        .map(AvatarUrl::new)
        .transpose()?;

    let mut account = store
        .find_by_id_any(id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("User not found: {id}")))?;

    account.update_profile(display_name, location, avatar_url);
    Ok(store.save(account).await?)
}

/// Activates or deactivates an account. Roles and profile are untouched.
pub async fn set_active<S: AccountStore>(
    store: &S,
    id: Uuid,
    active: bool,
) -> ServerResult<UserAccount> {
    let mut account = store
        .find_by_id_any(id)
        .await?
        .ok_or_else(|| ServerError::NotFound(format!("User not found: {id}")))?;

    if active {
        account.activate();
    } else {
        account.deactivate();
    }

    let account = store.save(account).await?;
    tracing::info!(account_id = %account.id(), active = account.is_active(), "Account state changed");
    Ok(account)
}

/// Counts active accounts.
pub async fn active_count<S: AccountStore>(store: &S) -> ServerResult<u64> {
    Ok(store.count_active().await?)
}

async fn ensure_email_free<S: AccountStore>(
    store: &S,
    email: &Email,
    owner: Option<Uuid>,
) -> ServerResult<()> {
    if let Some(existing) = store.find_by_email(email.as_str()).await? {
        if owner != Some(existing.id()) {
            return Err(ServerError::DuplicateEmail(email.as_str().to_string()));
        }
    }
    Ok(())
}

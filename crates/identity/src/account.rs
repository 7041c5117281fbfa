//! The `UserAccount` aggregate root.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AvatarUrl, DisplayName, Email, Location, UserProfile, UserRole};

/// Aggregate root for a user's identity at this backend.
///
/// The id is the identity provider's subject UUID, the permanent key for
/// this user. Email and roles are canonical in Keycloak and mirrored here;
/// the profile is owned locally. The role set is never empty: any mutation
/// that would empty it injects `Member` instead.
///
/// Accounts are never hard-deleted; `deactivate`/`activate` flip the
/// `active` flag and both states remain reachable from each other.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserAccount {
    id: Uuid,
    email: Email,
    profile: UserProfile,
    roles: HashSet<UserRole>,
    active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserAccount {
    /// Creates a new account with the default `Member` role.
    ///
    /// Called on registration, with the subject id the provider assigned.
    pub fn create(external_id: Uuid, email: Email, display_name: DisplayName) -> Self {
        let mut roles = HashSet::new();
        roles.insert(UserRole::Member);
        Self::build(external_id, email, display_name, roles)
    }

    /// Creates an account seeded from a verified token's assertion.
    ///
    /// Called when the user exists at the provider but has never been seen
    /// by this backend. An empty role set is replaced by `{Member}`.
    pub fn from_external_token(
        external_id: Uuid,
        email: Email,
        display_name: DisplayName,
        roles: HashSet<UserRole>,
    ) -> Self {
        let roles = if roles.is_empty() {
            HashSet::from([UserRole::Member])
        } else {
            roles
        };
        Self::build(external_id, email, display_name, roles)
    }

    fn build(id: Uuid, email: Email, display_name: DisplayName, roles: HashSet<UserRole>) -> Self {
        let now = Utc::now();
        Self {
            id,
            email,
            profile: UserProfile::new(id, display_name),
            roles,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Updates profile data.
    ///
    /// Display name is always replaced; location and avatar are replaced
    /// only when supplied; `None` means "leave unchanged", not "clear".
    pub fn update_profile(
        &mut self,
        display_name: DisplayName,
        location: Option<Location>,
        avatar_url: Option<AvatarUrl>,
    ) {
        self.profile.update_display_name(display_name);
        if let Some(location) = location {
            self.profile.update_location(location);
        }
        if let Some(avatar_url) = avatar_url {
            self.profile.update_avatar_url(avatar_url);
        }
        self.updated_at = Utc::now();
    }

    /// Replaces the entire role set with the provider's current assertion.
    ///
    /// Authoritative replacement, not a merge: a role removed at the
    /// provider disappears here on the next sync. An empty incoming set is
    /// healed to `{Member}`.
    pub fn synchronize_roles(&mut self, new_roles: HashSet<UserRole>) {
        self.roles = if new_roles.is_empty() {
            HashSet::from([UserRole::Member])
        } else {
            new_roles
        };
        self.updated_at = Utc::now();
    }

    /// Marks the account inactive. Roles and profile are untouched.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.updated_at = Utc::now();
    }

    /// Marks the account active again.
    pub fn activate(&mut self) {
        self.active = true;
        self.updated_at = Utc::now();
    }

    /// Returns true if the account holds the given role.
    pub fn has_role(&self, role: UserRole) -> bool {
        self.roles.contains(&role)
    }

    /// Returns true if the account holds the admin role.
    pub fn is_admin(&self) -> bool {
        self.has_role(UserRole::Admin)
    }

    /// Returns true if the account holds the moderator role.
    pub fn is_moderator(&self) -> bool {
        self.has_role(UserRole::Moderator)
    }

    /// Returns the provider subject id.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the email address.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Returns the owned profile.
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Returns the current role set.
    pub fn roles(&self) -> &HashSet<UserRole> {
        &self.roles
    }

    /// Returns true if the account is active.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Returns when the account was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the account was last updated.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Rebuilds an account from persisted fields. Store use only; the
    /// non-empty role invariant is re-applied.
    pub fn from_parts(
        id: Uuid,
        email: Email,
        profile: UserProfile,
        roles: HashSet<UserRole>,
        active: bool,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        let roles = if roles.is_empty() {
            HashSet::from([UserRole::Member])
        } else {
            roles
        };
        Self {
            id,
            email,
            profile,
            roles,
            active,
            created_at,
            updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> UserAccount {
        UserAccount::create(
            Uuid::new_v4(),
            Email::new("alice@example.com").unwrap(),
            DisplayName::new("Alice").unwrap(),
        )
    }

    #[test]
    fn test_create_defaults() {
        let account = account();
        assert!(account.is_active());
        assert_eq!(account.roles().len(), 1);
        assert!(account.has_role(UserRole::Member));
        assert!(!account.is_admin());
        assert_eq!(account.profile().user_id(), account.id());
    }

    #[test]
    fn test_from_external_token_empty_roles_heals_to_member() {
        let account = UserAccount::from_external_token(
            Uuid::new_v4(),
            Email::new("bob@example.com").unwrap(),
            DisplayName::new("Bob").unwrap(),
            HashSet::new(),
        );
        assert_eq!(account.roles(), &HashSet::from([UserRole::Member]));
    }

    #[test]
    fn test_from_external_token_keeps_supplied_roles() {
        let account = UserAccount::from_external_token(
            Uuid::new_v4(),
            Email::new("carol@example.com").unwrap(),
            DisplayName::new("Carol").unwrap(),
            HashSet::from([UserRole::Admin, UserRole::Moderator]),
        );
        assert!(account.is_admin());
        assert!(account.is_moderator());
        assert!(!account.has_role(UserRole::Member));
    }

    #[test]
    fn test_synchronize_roles_replaces_wholesale() {
        let mut account = account();
        account.synchronize_roles(HashSet::from([UserRole::Member, UserRole::Moderator]));
        assert_eq!(account.roles().len(), 2);

        account.synchronize_roles(HashSet::from([UserRole::Admin]));
        assert_eq!(account.roles(), &HashSet::from([UserRole::Admin]));
    }

    #[test]
    fn test_synchronize_roles_empty_set_yields_member() {
        let mut account = account();
        account.synchronize_roles(HashSet::from([UserRole::Admin]));
        account.synchronize_roles(HashSet::new());
        assert_eq!(account.roles(), &HashSet::from([UserRole::Member]));
    }

    #[test]
    fn test_deactivate_then_activate_round_trip() {
        let mut account = account();
        account.synchronize_roles(HashSet::from([UserRole::Moderator]));
        let roles_before = account.roles().clone();

        account.deactivate();
        assert!(!account.is_active());
        account.activate();
        assert!(account.is_active());
        assert_eq!(account.roles(), &roles_before);
        assert_eq!(account.profile().display_name().as_str(), "Alice");
    }

    #[test]
    fn test_update_profile_leaves_absent_fields_unchanged() {
        let mut account = account();
        account.update_profile(
            DisplayName::new("Alice B").unwrap(),
            Some(Location::new("Lyon").unwrap()),
            None,
        );
        account.update_profile(DisplayName::new("Alice C").unwrap(), None, None);

        assert_eq!(account.profile().display_name().as_str(), "Alice C");
        assert_eq!(account.profile().location().unwrap().as_str(), "Lyon");
        assert!(account.profile().avatar_url().is_none());
    }
}

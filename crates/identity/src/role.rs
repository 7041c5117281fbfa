//! User roles synchronized from the identity provider.
//!
//! Roles are defined in the Keycloak realm, carried in the JWT `roles`
//! claim, and mirrored here for local authorization checks.

use serde::{Deserialize, Serialize};

/// A role held by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Basic user with trading capabilities.
    Member,
    /// User with moderation privileges.
    Moderator,
    /// Full system access.
    Admin,
}

impl Default for UserRole {
    fn default() -> Self {
        Self::Member
    }
}

impl UserRole {
    /// Resolves a role name from a token claim, case-insensitively.
    ///
    /// Unknown or empty names resolve to `Member`: the token is already
    /// trusted, and a provider-side role rename must not lock users out.
    pub fn from_claim(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "MODERATOR" => Self::Moderator,
            "ADMIN" => Self::Admin,
            _ => Self::Member,
        }
    }

    /// Returns the canonical role name as stored and serialized.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "MEMBER",
            Self::Moderator => "MODERATOR",
            Self::Admin => "ADMIN",
        }
    }

    /// Returns the human-readable label.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Member => "Member",
            Self::Moderator => "Moderator",
            Self::Admin => "Administrator",
        }
    }

    /// Returns the role description.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Member => "Basic user with trading capabilities",
            Self::Moderator => "User with moderation privileges",
            Self::Admin => "Full system access",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_claim_case_insensitive() {
        assert_eq!(UserRole::from_claim("admin"), UserRole::Admin);
        assert_eq!(UserRole::from_claim("Admin"), UserRole::Admin);
        assert_eq!(UserRole::from_claim("MODERATOR"), UserRole::Moderator);
        assert_eq!(UserRole::from_claim("member"), UserRole::Member);
    }

    #[test]
    fn test_from_claim_unknown_defaults_to_member() {
        assert_eq!(UserRole::from_claim(""), UserRole::Member);
        assert_eq!(UserRole::from_claim("SUPERUSER"), UserRole::Member);
    }

    #[test]
    fn test_canonical_names() {
        assert_eq!(UserRole::Admin.as_str(), "ADMIN");
        assert_eq!(UserRole::Member.display_name(), "Member");
        assert!(!UserRole::Moderator.description().is_empty());
    }
}

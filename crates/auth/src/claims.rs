//! JWT claims and the identity they assert.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AuthError, AuthResult};

/// Claims carried by a Keycloak access token.
///
/// Only the claims this backend consumes are modeled; the `roles` claim is
/// kept as raw JSON because its shape is provider-controlled and absence
/// must not be a deserialization error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the provider's stable user UUID.
    pub sub: String,
    /// Email address.
    pub email: String,
    /// Display name, if the provider supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Preferred username, if the provider supplies one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_username: Option<String>,
    /// Issued at timestamp.
    #[serde(default)]
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
    /// Issuer.
    #[serde(default)]
    pub iss: String,
    /// Realm roles, as issued. Absent or malformed claims are tolerated.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub roles: serde_json::Value,
}

impl Claims {
    /// Returns the subject as a UUID.
    pub fn user_id(&self) -> AuthResult<Uuid> {
        self.sub.parse().map_err(|_| AuthError::InvalidSubject)
    }

    /// Extracts the identity this token asserts.
    pub fn asserted_identity(&self) -> AuthResult<AssertedIdentity> {
        Ok(AssertedIdentity {
            id: self.user_id()?,
            email: self.email.clone(),
            display_name: self.display_name().to_string(),
            roles: self.role_names(),
        })
    }

    /// Returns the display name, falling back to the preferred username
    /// and finally the email address.
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.preferred_username.as_deref())
            .unwrap_or(&self.email)
    }

    /// Returns the string elements of the `roles` claim, unprefixed.
    ///
    /// Absent or non-array claims yield an empty list; non-string elements
    /// are dropped.
    pub fn role_names(&self) -> Vec<String> {
        match self.roles.as_array() {
            Some(values) => values
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
            None => Vec::new(),
        }
    }
}

/// The identity asserted by a verified token.
///
/// This is the backend's trusted inbound interface: the token has already
/// passed signature, expiry, and issuer checks, so these fields are taken
/// at face value.
#[derive(Debug, Clone)]
pub struct AssertedIdentity {
    /// The provider's stable subject UUID.
    pub id: Uuid,
    /// Email address as asserted (mutable metadata, not an identity key).
    pub email: String,
    /// Display name after fallbacks.
    pub display_name: String,
    /// Role names as issued, unprefixed and unnormalized.
    pub roles: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn claims(roles: serde_json::Value) -> Claims {
        Claims {
            sub: Uuid::new_v4().to_string(),
            email: "alice@example.com".to_string(),
            name: Some("Alice".to_string()),
            preferred_username: Some("alice".to_string()),
            iat: 0,
            exp: i64::MAX,
            iss: "https://keycloak.example.com/realms/bookcycle".to_string(),
            roles,
        }
    }

    #[test]
    fn test_display_name_fallback_chain() {
        let mut c = claims(json!(null));
        assert_eq!(c.display_name(), "Alice");
        c.name = None;
        assert_eq!(c.display_name(), "alice");
        c.preferred_username = None;
        assert_eq!(c.display_name(), "alice@example.com");
    }

    #[test]
    fn test_role_names_from_array() {
        let c = claims(json!(["MEMBER", "MODERATOR"]));
        assert_eq!(c.role_names(), vec!["MEMBER", "MODERATOR"]);
    }

    #[test]
    fn test_role_names_drops_non_strings() {
        let c = claims(json!(["MEMBER", 42, null, {"role": "ADMIN"}]));
        assert_eq!(c.role_names(), vec!["MEMBER"]);
    }

    #[test]
    fn test_role_names_absent_or_malformed_is_empty() {
        assert!(claims(json!(null)).role_names().is_empty());
        assert!(claims(json!("MEMBER")).role_names().is_empty());
        assert!(claims(json!({"realm": ["MEMBER"]})).role_names().is_empty());
    }

    #[test]
    fn test_asserted_identity_rejects_non_uuid_subject() {
        let mut c = claims(json!([]));
        c.sub = "not-a-uuid".to_string();
        assert!(matches!(
            c.asserted_identity(),
            Err(AuthError::InvalidSubject)
        ));
    }

    #[test]
    fn test_claims_deserialize_without_roles() {
        let raw = json!({
            "sub": Uuid::new_v4().to_string(),
            "email": "bob@example.com",
            "exp": 4102444800i64,
        });
        let c: Claims = serde_json::from_value(raw).unwrap();
        assert!(c.roles.is_null());
        assert!(c.role_names().is_empty());
    }
}

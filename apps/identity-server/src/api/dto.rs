//! Request and response DTOs for the identity API.
//!
//! Wire format is camelCase JSON. DTOs are shaped for the API, not the
//! domain; conversion happens at the handler boundary.

use chrono::{DateTime, Utc};
use identity::UserAccount;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registration request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    /// Forwarded to Keycloak, which owns credential storage. Only shape
    /// checks happen here.
    pub password: String,
    pub display_name: String,
}

/// Registration confirmation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub message: String,
}

/// Profile update request. Absent or empty optional fields mean "leave
/// unchanged", not "clear".
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub display_name: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Full profile view.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileResponse {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub location: Option<String>,
    pub avatar_url: Option<String>,
    pub roles: Vec<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfileResponse {
    /// Builds the profile view from an account aggregate.
    pub fn from_account(account: &UserAccount) -> Self {
        let profile = account.profile();
        let mut roles: Vec<String> = account
            .roles()
            .iter()
            .map(|r| r.as_str().to_string())
            .collect();
        roles.sort();

        Self {
            id: account.id(),
            email: account.email().to_string(),
            display_name: profile.display_name().to_string(),
            location: profile.location().map(|l| l.to_string()),
            avatar_url: profile.avatar_url().map(|u| u.to_string()),
            roles,
            active: account.is_active(),
            created_at: account.created_at(),
            updated_at: account.updated_at(),
        }
    }
}

/// Login flow information. Authentication itself happens at Keycloak.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginInfoResponse {
    pub keycloak_url: String,
    pub message: String,
}

/// Password reset request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetRequest {
    pub email: String,
}

/// Password reset confirmation, carrying the emailed token.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordResetConfirmRequest {
    pub token: String,
    pub new_password: String,
}

/// Generic message response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
}

/// Active account statistics.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub active_accounts: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use identity::{DisplayName, Email};
    use serde_json::json;

    #[test]
    fn test_profile_response_is_camel_case() {
        let account = UserAccount::create(
            Uuid::new_v4(),
            Email::new("alice@example.com").unwrap(),
            DisplayName::new("Alice").unwrap(),
        );
        let value = serde_json::to_value(UserProfileResponse::from_account(&account)).unwrap();

        assert_eq!(value["displayName"], json!("Alice"));
        assert_eq!(value["roles"], json!(["MEMBER"]));
        assert_eq!(value["active"], json!(true));
        assert!(value["location"].is_null());
        assert!(value.get("display_name").is_none());
    }

    #[test]
    fn test_password_reset_confirm_request_is_camel_case() {
        let request: PasswordResetConfirmRequest =
            serde_json::from_value(json!({"token": "abc", "newPassword": "s3cret-pass"}))
                .unwrap();
        assert_eq!(request.token, "abc");
        assert_eq!(request.new_password, "s3cret-pass");
    }

    #[test]
    fn test_update_request_optionals_default_to_none() {
        let request: UpdateProfileRequest =
            serde_json::from_value(json!({"displayName": "Alice"})).unwrap();
        assert!(request.location.is_none());
        assert!(request.avatar_url.is_none());
    }
}

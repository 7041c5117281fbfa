//! Self-validating value objects for the identity domain.
//!
//! Each wrapper enforces its format at construction time; an invalid
//! instance can never exist. Constructors return `IdentityError::Validation`
//! with the offending field name.

use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::{IdentityError, IdentityResult};

static EMAIL_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"^[A-Za-z0-9+_.-]+@(.+)$").expect("regex pattern is valid")
});

/// A validated email address.
///
/// Email is owned by Keycloak; the backend stores a copy for lookups.
/// The stored value round-trips the exact input (no trimming or
/// case-folding). Length bounds here and on the other wrappers count
/// characters, not bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Maximum email length (RFC 5321 limit).
    pub const MAX_LEN: usize = 254;

    /// Validates and wraps an email address.
    pub fn new(value: impl Into<String>) -> IdentityResult<Self> {
        let value = value.into();
        if !EMAIL_RE.is_match(&value) {
            return Err(IdentityError::validation("email", "invalid format"));
        }
        if value.chars().count() > Self::MAX_LEN {
            return Err(IdentityError::validation(
                "email",
                format!("exceeds {} characters", Self::MAX_LEN),
            ));
        }
        Ok(Self(value))
    }

    /// Returns the email as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The user's public display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DisplayName(String);

impl DisplayName {
    /// Minimum trimmed length.
    pub const MIN_LEN: usize = 2;
    /// Maximum trimmed length.
    pub const MAX_LEN: usize = 100;

    /// Validates and wraps a display name.
    pub fn new(value: impl Into<String>) -> IdentityResult<Self> {
        let value = value.into();
        let trimmed_len = value.trim().chars().count();
        if trimmed_len < Self::MIN_LEN {
            return Err(IdentityError::validation(
                "display_name",
                format!("must be at least {} characters", Self::MIN_LEN),
            ));
        }
        if trimmed_len > Self::MAX_LEN {
            return Err(IdentityError::validation(
                "display_name",
                format!("cannot exceed {} characters", Self::MAX_LEN),
            ));
        }
        Ok(Self(value))
    }

    /// Returns the display name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The user's location (city/region). Optional at the profile level;
/// absence is `None`, never an empty string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(String);

impl Location {
    /// Maximum length.
    pub const MAX_LEN: usize = 100;

    /// Validates and wraps a location. The input is trimmed.
    pub fn new(value: impl Into<String>) -> IdentityResult<Self> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            return Err(IdentityError::validation("location", "cannot be empty"));
        }
        if value.chars().count() > Self::MAX_LEN {
            return Err(IdentityError::validation(
                "location",
                format!("cannot exceed {} characters", Self::MAX_LEN),
            ));
        }
        Ok(Self(value))
    }

    /// Returns the location as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// URL of the user's avatar image. Optional at the profile level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvatarUrl(String);

impl AvatarUrl {
    /// Maximum URL length.
    pub const MAX_LEN: usize = 500;

    /// Validates and wraps an avatar URL. The input is trimmed and must
    /// use the http or https scheme.
    pub fn new(value: impl Into<String>) -> IdentityResult<Self> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            return Err(IdentityError::validation("avatar_url", "cannot be empty"));
        }
        if !value.starts_with("http://") && !value.starts_with("https://") {
            return Err(IdentityError::validation(
                "avatar_url",
                "must be an http:// or https:// URL",
            ));
        }
        if value.chars().count() > Self::MAX_LEN {
            return Err(IdentityError::validation(
                "avatar_url",
                format!("cannot exceed {} characters", Self::MAX_LEN),
            ));
        }
        Ok(Self(value))
    }

    /// Returns the URL as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AvatarUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_round_trips_input() {
        let email = Email::new("Alice+books@Example.COM").unwrap();
        assert_eq!(email.as_str(), "Alice+books@Example.COM");
    }

    #[test]
    fn test_email_rejects_bad_format() {
        assert!(Email::new("no-at-sign").is_err());
        assert!(Email::new("@example.com").is_err());
        assert!(Email::new("user@").is_err());
        assert!(Email::new("spa ce@example.com").is_err());
    }

    #[test]
    fn test_email_rejects_overlong() {
        let long = format!("{}@example.com", "a".repeat(250));
        assert!(Email::new(long).is_err());
    }

    #[test]
    fn test_display_name_bounds() {
        assert!(DisplayName::new("A").is_err());
        assert!(DisplayName::new("  A  ").is_err());
        assert!(DisplayName::new("Al").is_ok());
        assert!(DisplayName::new("a".repeat(100)).is_ok());
        assert!(DisplayName::new("a".repeat(101)).is_err());
    }

    #[test]
    fn test_length_bounds_count_characters_not_bytes() {
        // 60 characters, 120 bytes.
        let accented = "é".repeat(60);
        assert!(DisplayName::new(accented).is_ok());
        assert!(DisplayName::new("é".repeat(100)).is_ok());
        assert!(DisplayName::new("é".repeat(101)).is_err());

        assert!(Location::new("京".repeat(100)).is_ok());
        assert!(Location::new("京".repeat(101)).is_err());

        let email = format!("{}@example.com", "ü".repeat(240));
        assert!(Email::new(email).is_ok());

        let url = format!("https://cdn.example.com/{}", "ö".repeat(470));
        assert!(AvatarUrl::new(url).is_ok());
    }

    #[test]
    fn test_location_trims_and_rejects_empty() {
        let location = Location::new("  Lyon  ").unwrap();
        assert_eq!(location.as_str(), "Lyon");
        assert!(Location::new("   ").is_err());
        assert!(Location::new("x".repeat(101)).is_err());
    }

    #[test]
    fn test_avatar_url_scheme_and_length() {
        assert!(AvatarUrl::new("https://cdn.example.com/a.png").is_ok());
        assert!(AvatarUrl::new("http://cdn.example.com/a.png").is_ok());
        assert!(AvatarUrl::new("ftp://cdn.example.com/a.png").is_err());
        assert!(AvatarUrl::new("cdn.example.com/a.png").is_err());
        let long = format!("https://{}", "a".repeat(500));
        assert!(AvatarUrl::new(long).is_err());
    }
}

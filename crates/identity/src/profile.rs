//! User profile entity, owned by the `UserAccount` aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AvatarUrl, DisplayName, Location};

/// Profile data owned by a user account.
///
/// Keyed by the owning account's id (a foreign-key-style reference, no
/// back pointer). Display name is required; location and avatar are
/// optional. Every mutation refreshes `updated_at`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    user_id: Uuid,
    display_name: DisplayName,
    location: Option<Location>,
    avatar_url: Option<AvatarUrl>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Creates a profile for the given account id.
    pub fn new(user_id: Uuid, display_name: DisplayName) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            display_name,
            location: None,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the display name.
    pub fn update_display_name(&mut self, display_name: DisplayName) {
        self.display_name = display_name;
        self.updated_at = Utc::now();
    }

    /// Replaces the location.
    pub fn update_location(&mut self, location: Location) {
        self.location = Some(location);
        self.updated_at = Utc::now();
    }

    /// Replaces the avatar URL.
    pub fn update_avatar_url(&mut self, avatar_url: AvatarUrl) {
        self.avatar_url = Some(avatar_url);
        self.updated_at = Utc::now();
    }

    /// Returns the owning account's id.
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }

    /// Returns the display name.
    pub fn display_name(&self) -> &DisplayName {
        &self.display_name
    }

    /// Returns the location, if set.
    pub fn location(&self) -> Option<&Location> {
        self.location.as_ref()
    }

    /// Returns the avatar URL, if set.
    pub fn avatar_url(&self) -> Option<&AvatarUrl> {
        self.avatar_url.as_ref()
    }

    /// Returns when the profile was created.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the profile was last updated.
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Rebuilds a profile from persisted fields. Store use only.
    pub fn from_parts(
        user_id: Uuid,
        display_name: DisplayName,
        location: Option<Location>,
        avatar_url: Option<AvatarUrl>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id,
            display_name,
            location,
            avatar_url,
            created_at,
            updated_at,
        }
    }
}

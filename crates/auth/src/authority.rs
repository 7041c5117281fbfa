//! Conversion of token role claims into local authorities.

use std::collections::HashSet;

use crate::Claims;

/// Prefix applied to every role name when granting authorities.
pub const ROLE_PREFIX: &str = "ROLE_";

/// Authority granted to admins.
pub const ROLE_ADMIN: &str = "ROLE_ADMIN";

/// Authority granted to moderators.
pub const ROLE_MODERATOR: &str = "ROLE_MODERATOR";

/// Converts the `roles` claim into the set of authorities to attach to the
/// authenticated session.
///
/// Pure and deterministic. An absent or non-array claim yields an empty
/// set; the principal stays authenticated, just privilege-less.
/// Non-string elements are dropped, duplicates collapse, and case is NOT
/// normalized: `"member"` becomes `ROLE_member`, which will never match
/// `ROLE_MEMBER` checks. Role casing is the realm's responsibility.
pub fn authorities_from_claims(claims: &Claims) -> HashSet<String> {
    match claims.roles.as_array() {
        Some(values) => values
            .iter()
            .filter_map(|v| v.as_str())
            .map(|role| format!("{ROLE_PREFIX}{role}"))
            .collect(),
        None => HashSet::new(),
    }
}

//! Bearer-token verification and claims handling for BookCycle.
//!
//! This crate provides:
//! - JWT validation against the Keycloak realm (signature, expiry, issuer)
//! - Claims extraction into an asserted identity
//! - Conversion of the `roles` claim into local authorities
//!
//! Token issuance, credential checks, and role administration all live in
//! Keycloak; nothing here signs or mints tokens.

mod authority;
mod claims;
mod error;
mod verifier;

pub use authority::*;
pub use claims::*;
pub use error::*;
pub use verifier::*;

//! Identity domain model for BookCycle.
//!
//! This crate owns the `UserAccount` aggregate and its value objects.
//! Credentials and role issuance live in Keycloak; the backend keeps a
//! local profile plus a synchronized copy of the user's roles, keyed by
//! the provider's subject UUID.

mod account;
mod error;
mod profile;
mod role;
mod values;

pub use account::*;
pub use error::*;
pub use profile::*;
pub use role::*;
pub use values::*;

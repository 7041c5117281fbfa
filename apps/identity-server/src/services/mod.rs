//! Application services.

pub mod identity;

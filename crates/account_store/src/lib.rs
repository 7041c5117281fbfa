//! User account persistence for BookCycle.
//!
//! This crate provides the `AccountStore` contract consumed by the
//! identity use cases, an in-memory implementation for tests and
//! single-node dev mode, and a PostgreSQL implementation behind the
//! `sqlx` feature.

mod error;
mod memory;
mod store;

#[cfg(feature = "sqlx")]
mod postgres;

pub use error::*;
pub use memory::*;
pub use store::*;

#[cfg(feature = "sqlx")]
pub use postgres::*;

//! SQLite backend for the Hirely marketplace.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. The uniqueness invariants the core
//! relies on are declared in the schema and surfaced as
//! [`Error::Conflict`].

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;

#[cfg(test)]
mod tests;

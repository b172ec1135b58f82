//! # storage-adapters
//!
//! Persistence and notification adapters implementing the `domains` ports.
//! The in-memory store is always compiled; Postgres sits behind the
//! `db-postgres` feature.

pub mod memory;
pub mod notify;

#[cfg(feature = "db-postgres")]
pub mod postgres;

pub use memory::InMemoryStore;
pub use notify::LogNotifier;

#[cfg(feature = "db-postgres")]
pub use postgres::PgStore;

//! Persistence layer for the cricket club backend.
//!
//! This crate contains:
//! - Database connection management and migrations
//! - Entity definitions (database row mappings)
//! - Repository implementations
//! - `PgStore`, the PostgreSQL implementation of the domain store traits
//!   (handshake, roster, and the match and tournament listings)

pub mod db;
pub mod entities;
pub mod metrics;
pub mod repositories;
pub mod store;

pub use store::PgStore;

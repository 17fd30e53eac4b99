//! Domain layer for the cricket club backend.
//!
//! This crate contains:
//! - Domain models (TempUser, Player, Match, Tournament, validated inputs)
//! - The registration handshake service and its collaborator traits
//! - The read-only match and tournament listings
//! - Domain error types

pub mod models;
pub mod services;

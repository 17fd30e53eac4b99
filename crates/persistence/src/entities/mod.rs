//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod fixture;
pub mod player;
pub mod temp_user;
pub mod tournament;

pub use fixture::MatchEntity;
pub use player::{InvalidColumn, PlayerEntity};
pub use temp_user::TempUserEntity;
pub use tournament::TournamentEntity;

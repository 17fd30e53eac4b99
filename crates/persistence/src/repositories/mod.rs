//! Repository implementations for database operations.

pub mod fixture;
pub mod player;
pub mod temp_user;
pub mod tournament;

pub use fixture::MatchRepository;
pub use player::{PerformanceInput, PlayerInput, PlayerRepository};
pub use temp_user::TempUserRepository;
pub use tournament::TournamentRepository;

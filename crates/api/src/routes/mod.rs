//! HTTP route handlers.

pub mod fixtures;
pub mod health;
pub mod players;
pub mod temp;

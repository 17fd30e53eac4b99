//! Outbound integrations.

pub mod email;

pub use email::{EmailError, EmailService};

//! Shared utilities for the cricket club backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Cryptographic helpers (fingerprints, one-time code generation)
//! - Password hashing with Argon2id
//! - Email and code validation

pub mod crypto;
pub mod password;
pub mod validation;

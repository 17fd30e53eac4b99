//! Common validation utilities.

use validator::ValidateEmail;

/// Canonical form of an email address: surrounding whitespace removed,
/// lower-cased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Returns true when `email` is syntactically valid (HTML5 rules, as the
/// `validator` crate implements them).
pub fn is_valid_email(email: &str) -> bool {
    email.validate_email()
}

/// Returns true when `code` consists of exactly `length` ASCII digits.
pub fn is_numeric_code(code: &str, length: usize) -> bool {
    code.len() == length && code.bytes().all(|b| b.is_ascii_digit())
}

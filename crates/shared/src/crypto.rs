//! Cryptographic helpers for one-time codes and log-safe identifiers.

use rand::{rngs::OsRng, Rng};
use sha2::{Digest, Sha256};

/// Number of hex characters kept from an email fingerprint.
const FINGERPRINT_LEN: usize = 12;

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Short, stable identifier for an email address that is safe to log.
pub fn email_fingerprint(email: &str) -> String {
    let mut digest = sha256_hex(email);
    digest.truncate(FINGERPRINT_LEN);
    digest
}

/// Generates a numeric one-time code of exactly `length` digits.
///
/// The first digit is never zero, so a six digit code is uniform over
/// `100000..=999999`. Uses the operating system RNG.
pub fn generate_numeric_code(length: usize) -> String {
    let length = length.max(1);
    let mut rng = OsRng;
    let mut code = String::with_capacity(length);
    code.push(char::from(b'0' + rng.gen_range(1..=9u8)));
    for _ in 1..length {
        code.push(char::from(b'0' + rng.gen_range(0..=9u8)));
    }
    code
}

/// Compares two strings without short-circuiting on the first differing byte.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

//! One-time code generation.

use shared::crypto::generate_numeric_code;
use std::collections::VecDeque;
use std::sync::Mutex;

pub trait OtpGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Uniformly random numeric codes from the OS RNG.
#[derive(Debug, Clone, Copy)]
pub struct RandomOtpGenerator {
    pub length: usize,
}

impl RandomOtpGenerator {
    pub fn new(length: usize) -> Self {
        Self { length }
    }
}

impl OtpGenerator for RandomOtpGenerator {
    fn generate(&self) -> String {
        generate_numeric_code(self.length)
    }
}

/// Hands out a fixed sequence of codes, then falls back to random ones.
#[derive(Debug)]
pub struct ScriptedOtpGenerator {
    codes: Mutex<VecDeque<String>>,
    fallback: RandomOtpGenerator,
}

impl ScriptedOtpGenerator {
    pub fn new<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            codes: Mutex::new(codes.into_iter().map(Into::into).collect()),
            fallback: RandomOtpGenerator::new(6),
        }
    }
}

impl OtpGenerator for ScriptedOtpGenerator {
    fn generate(&self) -> String {
        self.codes
            .lock()
            .ok()
            .and_then(|mut codes| codes.pop_front())
            .unwrap_or_else(|| self.fallback.generate())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_generator_length() {
        let gen = RandomOtpGenerator::new(6);
        for _ in 0..50 {
            let code = gen.generate();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert_ne!(code.as_bytes()[0], b'0');
        }
    }

    #[test]
    fn test_scripted_generator_then_fallback() {
        let gen = ScriptedOtpGenerator::new(["482913", "119004"]);
        assert_eq!(gen.generate(), "482913");
        assert_eq!(gen.generate(), "119004");
        let code = gen.generate();
        assert_eq!(code.len(), 6);
    }
}

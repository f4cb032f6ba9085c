//! Tournament access codes.
//!
//! A code is a low-assurance shared secret: six characters from `A-Z0-9`,
//! generated once when the tournament is created and compared in plaintext.
//! Whoever knows it may record results for that tournament.

use std::fmt;

use rand::Rng;
use subtle::ConstantTimeEq;

/// Number of characters in an access code
pub const ACCESS_CODE_LEN: usize = 6;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Access code gating write operations on a tournament
#[derive(Clone, PartialEq, Eq)]
pub struct AccessCode(String);

impl AccessCode {
    /// Generate a fresh code from the thread-local RNG
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::rng())
    }

    /// Generate a code from the given RNG
    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code = (0..ACCESS_CODE_LEN)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();
        Self(code)
    }

    /// Wrap a code loaded from storage
    pub fn from_stored(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Check that a string has the shape of an access code
    pub fn is_well_formed(candidate: &str) -> bool {
        candidate.len() == ACCESS_CODE_LEN && candidate.bytes().all(|b| ALPHABET.contains(&b))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Compare against a submitted code. Surrounding whitespace is ignored.
    pub fn matches(&self, candidate: &str) -> bool {
        secrets_match(&self.0, candidate.trim())
    }
}

impl fmt::Debug for AccessCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessCode(******)")
    }
}

/// Constant-time equality for shared secrets
pub fn secrets_match(expected: &str, candidate: &str) -> bool {
    expected.as_bytes().ct_eq(candidate.as_bytes()).into()
}

//! Short code generation and syntax checking.
//!
//! Codes are sampled from OS randomness over a URL-safe alphabet. Collisions
//! against the registry are resolved by resampling, bounded so a nearly-full
//! keyspace surfaces an error instead of a spin loop.

use regex::Regex;
use std::sync::LazyLock;

use crate::domain::registry::{Registry, RegistryError};

/// Length of generated short codes.
pub const CODE_LENGTH: usize = 6;

/// URL-safe alphabet: 64 symbols, so each sampled byte maps to exactly one
/// symbol with no modulo bias.
const CODE_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Attempts before giving up on finding a free code.
pub const MAX_GENERATION_ATTEMPTS: u32 = 10;

/// Accepted short-code syntax for lookups (covers generated and legacy codes).
static CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{4,10}$").expect("code regex must compile"));

/// Generates a random short code of [`CODE_LENGTH`] characters.
///
/// # Panics
///
/// Panics if the system random number generator fails (extremely rare).
pub fn generate_code() -> String {
    let mut buffer = [0u8; CODE_LENGTH];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    buffer
        .iter()
        .map(|b| CODE_ALPHABET[(b & 0x3f) as usize] as char)
        .collect()
}

/// Returns true if `code` has valid short-code syntax (4-10 characters from
/// the URL-safe alphabet).
pub fn is_valid_code(code: &str) -> bool {
    CODE_REGEX.is_match(code)
}

/// Samples codes until one is not held by an active record.
///
/// The registry performs the actual reservation atomically in
/// [`Registry::create`]; this probe only keeps the expected attempt count at
/// O(1). An expired holder does not count as taken — `create` replaces it.
///
/// # Errors
///
/// Returns [`RegistryError::ExhaustedKeyspace`] after
/// [`MAX_GENERATION_ATTEMPTS`] collisions, and propagates lookup failures.
pub async fn generate_unique(registry: &dyn Registry) -> Result<String, RegistryError> {
    for _ in 0..MAX_GENERATION_ATTEMPTS {
        let code = generate_code();

        match registry.find_by_code(&code).await? {
            Some(existing) if !existing.is_expired() => continue,
            _ => return Ok(code),
        }
    }

    Err(RegistryError::ExhaustedKeyspace {
        attempts: MAX_GENERATION_ATTEMPTS,
    })
}

//! Password hashing (PBKDF2-HMAC-SHA256, salted, constant-time verify).
//!
//! Encoded form: `pbkdf2-sha256$<iterations>$<salt b64>$<digest b64>`.

use base64::{Engine as _, engine::general_purpose::STANDARD_NO_PAD};
use hmac::{Hmac, Mac};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;

use courselib_core::{DomainError, DomainResult};

type HmacSha256 = Hmac<Sha256>;

const SCHEME: &str = "pbkdf2-sha256";
const SALT_LEN: usize = 16;
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;

/// Stored password digest. Never printed.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an already-encoded digest loaded from storage.
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PasswordError {
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordError>;

    /// `false` for a wrong password and for an unreadable stored digest alike.
    fn verify(&self, password: &str, hash: &PasswordHash) -> bool;
}

#[derive(Debug, Clone, Copy)]
pub struct Pbkdf2Hasher {
    iterations: u32,
}

impl Pbkdf2Hasher {
    pub const DEFAULT_ITERATIONS: u32 = 60_000;
    /// Upper bound for new hashes and for digests read back from storage.
    pub const MAX_ITERATIONS: u32 = 10 * Self::DEFAULT_ITERATIONS;

    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: iterations.clamp(1, Self::MAX_ITERATIONS),
        }
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }
}

impl Default for Pbkdf2Hasher {
    fn default() -> Self {
        Self::new(Self::DEFAULT_ITERATIONS)
    }
}

impl PasswordHasher for Pbkdf2Hasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordError> {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);

        let digest = derive(password.as_bytes(), &salt, self.iterations)?;
        Ok(PasswordHash(format!(
            "{SCHEME}${}${}${}",
            self.iterations,
            STANDARD_NO_PAD.encode(salt),
            STANDARD_NO_PAD.encode(digest)
        )))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> bool {
        let Some((iterations, salt, expected)) = parse(hash.as_str()) else {
            return false;
        };
        match derive(password.as_bytes(), &salt, iterations) {
            Ok(actual) => constant_time_eq(&actual, &expected),
            Err(_) => false,
        }
    }
}

/// Single-block PBKDF2 (32-byte output).
fn derive(password: &[u8], salt: &[u8], iterations: u32) -> Result<[u8; 32], PasswordError> {
    let mac = HmacSha256::new_from_slice(password).map_err(|e| PasswordError::Hashing(e.to_string()))?;

    let mut round = mac.clone();
    round.update(salt);
    round.update(&1u32.to_be_bytes());
    let mut block = [0u8; 32];
    block.copy_from_slice(&round.finalize().into_bytes());
    let mut out = block;

    for _ in 1..iterations {
        let mut round = mac.clone();
        round.update(&block);
        block.copy_from_slice(&round.finalize().into_bytes());
        for (o, b) in out.iter_mut().zip(block.iter()) {
            *o ^= b;
        }
    }
    Ok(out)
}

fn parse(encoded: &str) -> Option<(u32, Vec<u8>, Vec<u8>)> {
    let mut parts = encoded.split('$');
    if parts.next()? != SCHEME {
        return None;
    }
    let iterations: u32 = parts.next()?.parse().ok()?;
    let salt = STANDARD_NO_PAD.decode(parts.next()?).ok()?;
    let digest = STANDARD_NO_PAD.decode(parts.next()?).ok()?;
    if parts.next().is_some() || iterations == 0 || iterations > Pbkdf2Hasher::MAX_ITERATIONS {
        return None;
    }
    Some((iterations, salt, digest))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Password strength rule applied to sign-up and new passwords.
pub fn validate_password(field: &str, password: &str) -> DomainResult<()> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LEN {
        return Err(DomainError::validation(
            field,
            format!("must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
    if len > MAX_PASSWORD_LEN {
        return Err(DomainError::validation(
            field,
            format!("must be at most {MAX_PASSWORD_LEN} characters"),
        ));
    }
    Ok(())
}

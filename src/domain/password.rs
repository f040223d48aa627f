//! Password value object - salted one-way hashing.
//!
//! Hashes are argon2id PHC strings; every hash carries its own random salt.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use once_cell::sync::Lazy;

use crate::errors::{AppError, AppResult};

/// Digest checked when a login names an unknown user, so the failure path
/// costs the same as a real verification.
static DUMMY_HASH: Lazy<String> = Lazy::new(|| {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(b"dummy-password-never-matches", &salt)
        .map(|h| h.to_string())
        .unwrap_or_default()
});

/// Password value object that handles hashing and verification.
#[derive(Clone)]
pub struct Password {
    hash: String,
}

// Don't expose hash in debug output
impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Password")
            .field("hash", &"[REDACTED]")
            .finish()
    }
}

impl Password {
    /// Hash a plain text password with a fresh salt.
    ///
    /// Length rules belong to request validation; any plaintext is accepted here.
    pub fn new(plain_text: &str) -> AppResult<Self> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Self::argon2()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Password hash failed: {}", e)))?
            .to_string();
        Ok(Self { hash })
    }

    /// Create a Password from an existing hash (from database).
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    /// Stand-in digest used to equalize timing for unknown users.
    pub fn dummy() -> Self {
        Self::from_hash(DUMMY_HASH.as_str())
    }

    /// Consume and return the hash string.
    pub fn into_string(self) -> String {
        self.hash
    }

    /// Verify a plain text password against this hash.
    ///
    /// A malformed hash never matches.
    pub fn verify(&self, plain_text: &str) -> bool {
        match PasswordHash::new(&self.hash) {
            Ok(parsed) => Self::argon2()
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!("Stored password hash is malformed: {}", e);
                false
            }
        }
    }

    /// Hash on the blocking pool; argon2 is deliberately slow.
    pub async fn hash_blocking(plain_text: String) -> AppResult<Self> {
        tokio::task::spawn_blocking(move || Self::new(&plain_text))
            .await
            .map_err(|e| AppError::internal(format!("Hashing task failed: {}", e)))?
    }

    /// Verify on the blocking pool.
    pub async fn verify_blocking(self, plain_text: String) -> AppResult<bool> {
        tokio::task::spawn_blocking(move || self.verify(&plain_text))
            .await
            .map_err(|e| AppError::internal(format!("Verification task failed: {}", e)))
    }

    #[inline]
    fn argon2() -> Argon2<'static> {
        Argon2::default()
    }
}

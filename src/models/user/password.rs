//! Password hashing.
//!
//! Hashes are Argon2id PHC strings (`$argon2id$v=19$...`). Plaintext never
//! leaves this module.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString},
    Argon2,
};
use rand::RngCore as _;

use crate::error::PantryError;

/// Hashes a password with a fresh random salt.
pub fn hash(password: &str) -> Result<String, PantryError> {
    let mut salt_bytes = [0_u8; 16];
    rand::thread_rng().fill_bytes(&mut salt_bytes);

    let salt = SaltString::encode_b64(&salt_bytes)
        .map_err(|e| PantryError::PasswordHash(e.to_string()))?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .inspect_err(|e| tracing::error!("Argon2 failed to hash a password. err: {e}"))
        .map_err(|e| PantryError::PasswordHash(e.to_string()))
}

/// Checks a password against a stored hash.
///
/// A hash that doesn't parse never verifies.
pub fn verify(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        tracing::warn!("Stored password hash isn't a valid PHC string.");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

//! Password hashing
//!
//! Secure password hashing and verification using Argon2id.
//!
//! # Security
//!
//! - Uses the Argon2id variant (hybrid of Argon2i and Argon2d)
//! - Cost parameters come from configuration (`auth.hash`)
//! - Generates a random salt for each password hash
//!
//! The resulting PHC string embeds algorithm, parameters, and salt, so
//! verification needs no configuration.

use anyhow::{Context, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};

use crate::config::HashCost;

fn argon2_for(cost: &HashCost) -> Result<Argon2<'static>> {
    let params = Params::new(cost.memory_kib, cost.iterations, cost.parallelism, None)
        .map_err(|e| anyhow::anyhow!("Invalid argon2 cost parameters: {}", e))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a password using Argon2id with the given cost parameters.
///
/// Returns the hash in PHC string format (includes algorithm, parameters,
/// salt, and hash).
pub fn hash_password(password: &str, cost: &HashCost) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = argon2_for(cost)?;

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))
        .context("Password hashing failed")?;

    Ok(password_hash.to_string())
}

/// Verify a password against a stored hash.
///
/// Returns `true` if the password matches, `false` otherwise. Comparison is
/// delegated to the argon2 crate's own verifier.
///
/// # Errors
///
/// Returns an error if the hash is not a valid PHC string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {}", e))
        .context("Failed to parse password hash")?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow::anyhow!("Password verification failed: {}", e))
            .context("Password verification error"),
    }
}

//! Argon2id password hashing and verification.
//!
//! Each account gets its own random salt from [`OsRng`]. The salt is stored
//! in its own column and is also embedded in the PHC hash string, which is
//! what verification reads.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// A freshly hashed credential.
#[derive(Debug, Clone)]
pub struct HashedPassword {
    /// PHC-formatted Argon2id hash.
    pub hash: String,
    /// The base64 salt used for `hash`.
    pub salt: String,
}

/// Hash a plaintext password using Argon2id with a new random salt.
pub fn hash_password(password: &str) -> Result<HashedPassword, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(HashedPassword {
        hash: hash.to_string(),
        salt: salt.as_str().to_string(),
    })
}

/// Verify a plaintext password against a stored PHC-formatted hash.
///
/// Returns `Ok(true)` if the password matches, `Ok(false)` if it does not.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

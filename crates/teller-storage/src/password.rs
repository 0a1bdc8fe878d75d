//! Password hashing with Argon2.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use teller_core::error::TellerError;

/// Hash a password with a fresh random salt.
pub fn hash(password: &str) -> Result<String, TellerError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| TellerError::Auth(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a stored hash.
///
/// A malformed stored hash is an error; a wrong password is `Ok(false)`.
pub fn verify(password: &str, stored_hash: &str) -> Result<bool, TellerError> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| TellerError::Auth(format!("Invalid password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

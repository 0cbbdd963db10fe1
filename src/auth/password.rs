//! Password hashing for admin accounts (Argon2id, PHC string format).

use argon2::password_hash::rand_core::OsRng;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};

use crate::database::models::User;
use crate::error::AppError;

/// Well-formed hash with the default cost parameters and no known password.
/// Verified against on the unknown-user login path so both paths do the
/// same Argon2 work.
pub const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$8Zhh+EcJ7kR4a7F2bFLDuw$jO57Fz9mK1ALcXuD4gfgBvMgkIrbWyIZEa2SMaC71do";

/// Hashes `password` with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Hash(e.to_string()))
}

/// Verifies `password` against a stored PHC hash. A malformed hash counts as
/// a mismatch.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(password_hash) else {
        tracing::warn!("Stored password hash is malformed");
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

impl User {
    /// Replaces the stored hash. The caller persists the user.
    pub fn set_password(&mut self, password: &str) -> Result<(), AppError> {
        self.password_hash = hash_password(password)?;
        Ok(())
    }

    pub fn check_password(&self, password: &str) -> bool {
        verify_password(password, &self.password_hash)
    }
}

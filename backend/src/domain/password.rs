//! Salted password hashing for the credential store.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use rand::rngs::OsRng;

/// Well-formed Argon2id hash with default cost parameters that matches no
/// password. Logins for unknown emails verify against it so they cost the
/// same as a wrong password.
pub const DECOY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$/Dqpodl4zbMMzOPwDhZh7w$hMB08NugV+n+dLwTRMPq3R5ZQefN+PAnF63Rhb5fxgU";

/// Errors raised while hashing or parsing stored hashes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// The hasher rejected the input.
    #[error("failed to hash password: {message}")]
    Hash { message: String },
    /// A stored hash is not a valid PHC string.
    #[error("stored password hash is malformed: {message}")]
    Malformed { message: String },
}

/// Hash `password` with a fresh random salt, returning a PHC string.
///
/// # Examples
/// ```
/// use longbox::domain::password::{hash_password, verify_password};
///
/// let hash = hash_password("password").unwrap();
/// assert!(hash.starts_with("$argon2"));
/// assert!(verify_password("password", &hash).unwrap());
/// ```
pub fn hash_password(password: &str) -> Result<String, PasswordHashError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| PasswordHashError::Hash {
            message: err.to_string(),
        })
}

/// Check `password` against a stored PHC hash.
///
/// Returns `Ok(false)` for a mismatch and an error only when the stored hash
/// cannot be parsed.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, PasswordHashError> {
    let parsed = PasswordHash::new(stored_hash).map_err(|err| PasswordHashError::Malformed {
        message: err.to_string(),
    })?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Verifies plaintext passwords against stored hashes.
pub trait PasswordCheck: Send + Sync {
    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordHashError>;
}

/// Argon2 verification through [`verify_password`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Check;

impl PasswordCheck for Argon2Check {
    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, PasswordHashError> {
        verify_password(password, stored_hash)
    }
}

//! Argon2id implementation of the password hashing port.

use crate::user::{
    domain::PasswordHash,
    ports::{PasswordHashError, PasswordHasher},
};
use argon2::Argon2;
use argon2::password_hash::{
    self, PasswordHash as PhcHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
    rand_core::OsRng,
};

/// Argon2id hasher with the crate's default cost parameters.
///
/// Salts come from the operating system RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    /// Creates a hasher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

fn backend_error(err: password_hash::Error) -> PasswordHashError {
    PasswordHashError(err.to_string())
}

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let encoded = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(backend_error)?
            .to_string();
        Ok(PasswordHash::from_encoded(encoded))
    }

    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
        let parsed = PhcHash::new(hash.as_str()).map_err(backend_error)?;
        match Argon2::default().verify_password(password.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(backend_error(err)),
        }
    }
}

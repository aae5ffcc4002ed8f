//! One-way password hashing port.

use crate::user::domain::PasswordHash;
use thiserror::Error;

/// Hashes and verifies account passwords.
///
/// Implementations must be one-way: the service layer never sees or stores
/// the plain password beyond the call.
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plain password with a fresh salt.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError`] when the hashing backend fails.
    fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError>;

    /// Returns whether `password` matches `hash`.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError`] when the stored hash cannot be parsed.
    /// A well-formed hash that does not match yields `Ok(false)`.
    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError>;
}

/// Failure inside a password hashing backend.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("password hashing failed: {0}")]
pub struct PasswordHashError(pub String);

//! Adapter implementations for user account ports.

pub mod argon2;
pub mod memory;
pub mod postgres;

pub use argon2::Argon2PasswordHasher;

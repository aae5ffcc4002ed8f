//! Port contracts for user accounts.
//!
//! Ports define infrastructure-agnostic interfaces used by account services.

pub mod hasher;
pub mod repository;

pub use hasher::{PasswordHashError, PasswordHasher};
pub use repository::{UserRepository, UserRepositoryError, UserRepositoryResult};

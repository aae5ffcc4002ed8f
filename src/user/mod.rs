//! User accounts for tasktrack.
//!
//! Covers registration, credential checks, and administrator account
//! management. Roles live here because every access decision starts from the
//! acting user. The module follows the same hexagonal split as [`crate::task`]:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

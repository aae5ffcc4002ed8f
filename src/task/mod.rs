//! Task records and their field-level audit trail.
//!
//! Editing a task compares the submitted form with the stored task, applies
//! the differences and records one history entry per changed field. The task
//! update and its history are committed together. The module follows
//! hexagonal architecture:
//!
//! - Domain types and the edit engine in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;

//! Tasktrack: multi-user task tracking with a field-level audit trail.
//!
//! Users hold one of three roles, and a configurable capability table decides
//! what each role may see and change. Every edit to a task is diffed against
//! the stored record and each changed field is written to the task's history
//! in the same commit as the task itself.
//!
//! # Architecture
//!
//! Tasktrack follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, memory)
//!
//! # Modules
//!
//! - [`access`]: Role capabilities and visibility rules
//! - [`task`]: Tasks, the edit engine, and task history
//! - [`user`]: Accounts, roles, and password hashing
//! - [`config`]: Environment configuration
//! - [`db`]: `PostgreSQL` connection pooling
//! - [`telemetry`]: Log subscriber setup

pub mod access;
pub mod config;
pub mod db;
pub mod task;
pub mod telemetry;
pub mod user;

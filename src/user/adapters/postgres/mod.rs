//! `PostgreSQL` adapters for user account persistence.

mod models;
mod repository;
pub(crate) mod schema;

pub use repository::PostgresUserRepository;

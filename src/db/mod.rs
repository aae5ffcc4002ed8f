//! Shared `PostgreSQL` plumbing for the diesel adapters.
//!
//! Diesel connections are synchronous, so every adapter call hops onto the
//! blocking thread pool through [`run_blocking`].

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool, PoolError};

/// `PostgreSQL` connection pool shared by the task and user adapters.
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Builds a connection pool for `database_url`.
///
/// # Errors
///
/// Returns the r2d2 error when the pool cannot open its initial connections.
pub fn build_pool(database_url: &str, max_size: u32) -> Result<PgPool, PoolError> {
    let manager = ConnectionManager::<PgConnection>::new(database_url);
    Pool::builder().max_size(max_size).build(manager)
}

/// Runs a blocking closure and maps join errors into the caller's error type.
pub(crate) async fn run_blocking<F, T, E, M>(f: F, map_join_err: M) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Send + 'static,
    M: FnOnce(tokio::task::JoinError) -> E,
{
    tokio::task::spawn_blocking(f).await.map_err(map_join_err)?
}

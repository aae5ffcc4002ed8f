//! `PostgreSQL` repository implementation for user accounts.

use super::{
    models::{UserRecord, UserRow},
    schema::users,
};
use crate::db::{PgPool, run_blocking};
use crate::user::{
    domain::{EmailAddress, PersistedUserData, PasswordHash, Role, User, UserId, Username},
    ports::{UserRepository, UserRepositoryError, UserRepositoryResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};

/// `PostgreSQL`-backed user repository.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn with_connection<F, T>(&self, f: F) -> UserRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> UserRepositoryResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        run_blocking(
            move || {
                let mut connection = pool.get().map_err(UserRepositoryError::persistence)?;
                f(&mut connection)
            },
            UserRepositoryError::persistence,
        )
        .await
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn store(&self, user: &User) -> UserRepositoryResult<()> {
        let record = to_record(user);
        let subject = user.clone();
        self.with_connection(move |connection| {
            diesel::insert_into(users::table)
                .values(&record)
                .execute(connection)
                .map_err(|err| map_write_error(err, &subject))?;
            Ok(())
        })
        .await
    }

    async fn update(&self, user: &User) -> UserRepositoryResult<()> {
        let record = to_record(user);
        let subject = user.clone();
        self.with_connection(move |connection| {
            let affected = diesel::update(users::table.find(record.id))
                .set(&record)
                .execute(connection)
                .map_err(|err| map_write_error(err, &subject))?;
            if affected == 0 {
                return Err(UserRepositoryError::NotFound(subject.id()));
            }
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: UserId) -> UserRepositoryResult<Option<User>> {
        self.with_connection(move |connection| {
            let row = users::table
                .find(id.into_inner())
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn find_by_email(&self, email: &EmailAddress) -> UserRepositoryResult<Option<User>> {
        let lookup = email.as_str().to_owned();
        self.with_connection(move |connection| {
            let row = users::table
                .filter(users::email.eq(lookup))
                .select(UserRow::as_select())
                .first::<UserRow>(connection)
                .optional()
                .map_err(UserRepositoryError::persistence)?;
            row.map(row_to_user).transpose()
        })
        .await
    }

    async fn list(&self) -> UserRepositoryResult<Vec<User>> {
        self.with_connection(move |connection| {
            let rows = users::table
                .order((users::created_at.asc(), users::username.asc()))
                .select(UserRow::as_select())
                .load::<UserRow>(connection)
                .map_err(UserRepositoryError::persistence)?;
            rows.into_iter().map(row_to_user).collect()
        })
        .await
    }

    async fn delete(&self, id: UserId) -> UserRepositoryResult<()> {
        self.with_connection(move |connection| {
            let affected = diesel::delete(users::table.find(id.into_inner()))
                .execute(connection)
                .map_err(UserRepositoryError::persistence)?;
            if affected == 0 {
                return Err(UserRepositoryError::NotFound(id));
            }
            Ok(())
        })
        .await
    }
}

fn to_record(user: &User) -> UserRecord {
    UserRecord {
        id: user.id().into_inner(),
        username: user.username().as_str().to_owned(),
        email: user.email().as_str().to_owned(),
        password_hash: user.password_hash().as_str().to_owned(),
        is_admin: user.role().legacy_admin_flag(),
        role: Some(user.role().as_str().to_owned()),
        created_at: user.created_at(),
    }
}

fn row_to_user(row: UserRow) -> UserRepositoryResult<User> {
    let UserRow {
        id,
        username: persisted_username,
        email: persisted_email,
        password_hash,
        is_admin,
        role: persisted_role,
        created_at,
    } = row;

    let role = Role::from_legacy(persisted_role.as_deref(), is_admin)
        .map_err(UserRepositoryError::persistence)?;
    let username = Username::new(persisted_username).map_err(UserRepositoryError::persistence)?;
    let email = EmailAddress::new(persisted_email).map_err(UserRepositoryError::persistence)?;

    Ok(User::from_persisted(PersistedUserData {
        id: UserId::from_uuid(id),
        username,
        email,
        password_hash: PasswordHash::from_encoded(password_hash),
        role,
        created_at,
    }))
}

fn map_write_error(err: DieselError, user: &User) -> UserRepositoryError {
    match err {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info) => {
            match info.constraint_name() {
                Some("users_email_key") => {
                    UserRepositoryError::DuplicateEmail(user.email().clone())
                }
                Some("users_username_key") => {
                    UserRepositoryError::DuplicateUsername(user.username().clone())
                }
                _ => UserRepositoryError::DuplicateUser(user.id()),
            }
        }
        _ => UserRepositoryError::persistence(err),
    }
}

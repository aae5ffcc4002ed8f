//! Diesel row models for user persistence.

use super::schema::users;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for user records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRow {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub username: String,
    /// Login email.
    pub email: String,
    /// Encoded password hash.
    pub password_hash: String,
    /// Legacy admin flag.
    pub is_admin: bool,
    /// Role name, if recorded.
    pub role: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Insert and update model for user records.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = users)]
pub struct UserRecord {
    /// User identifier.
    pub id: uuid::Uuid,
    /// Display name.
    pub username: String,
    /// Login email.
    pub email: String,
    /// Encoded password hash.
    pub password_hash: String,
    /// Legacy admin flag derived from the role.
    pub is_admin: bool,
    /// Role name.
    pub role: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

//! Diesel schema for user accounts.

diesel::table! {
    /// Registered user accounts.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Unique display name.
        #[max_length = 80]
        username -> Varchar,
        /// Unique, lower-cased login email.
        #[max_length = 255]
        email -> Varchar,
        /// PHC-encoded password hash.
        password_hash -> Text,
        /// Legacy admin flag kept in step with `role`.
        is_admin -> Bool,
        /// Role name; null in rows written before roles existed.
        #[max_length = 20]
        role -> Nullable<Varchar>,
        /// Creation timestamp.
        created_at -> Timestamptz,
    }
}

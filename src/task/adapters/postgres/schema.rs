//! Diesel schema for tasks, their history, and labels.

diesel::table! {
    /// Task records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Title.
        #[max_length = 100]
        task_name -> Varchar,
        /// Free-text description.
        description -> Text,
        /// Status storage name.
        #[max_length = 20]
        status -> Varchar,
        /// Priority storage name.
        #[max_length = 20]
        priority -> Varchar,
        /// Owning user.
        user_id -> Uuid,
        /// Planned start.
        start_date -> Nullable<Timestamp>,
        /// Planned finish.
        finish_date -> Nullable<Timestamp>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Latest edit timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// One row per changed field per edit.
    task_history (id) {
        /// Entry identifier.
        id -> Uuid,
        /// Edited task.
        task_id -> Uuid,
        /// Editing user.
        changed_by -> Uuid,
        /// Edit timestamp.
        changed_at -> Timestamptz,
        /// Field name.
        #[max_length = 50]
        field_name -> Varchar,
        /// Rendered value before the edit.
        old_value -> Text,
        /// Rendered value after the edit.
        new_value -> Text,
    }
}

diesel::table! {
    /// Task categories.
    categories (id) {
        /// Category identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 100]
        category_name -> Varchar,
    }
}

diesel::table! {
    /// Many-to-many link between tasks and categories.
    task_categories (task_id, category_id) {
        /// Linked task.
        task_id -> Uuid,
        /// Linked category.
        category_id -> Uuid,
    }
}

diesel::table! {
    /// Free-standing tags.
    tags (id) {
        /// Tag identifier.
        id -> Uuid,
        /// Display name.
        #[max_length = 100]
        tag_name -> Varchar,
    }
}

diesel::joinable!(task_history -> tasks (task_id));
diesel::joinable!(task_categories -> tasks (task_id));
diesel::joinable!(task_categories -> categories (category_id));

diesel::allow_tables_to_appear_in_same_query!(
    tasks,
    task_history,
    categories,
    task_categories,
    tags,
);

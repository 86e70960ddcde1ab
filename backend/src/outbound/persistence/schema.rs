//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique public handle (max 150 characters).
        username -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        /// Registration timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Topic groups posts may be filed under.
    groups (id) {
        id -> Int8,
        /// Display title (max 200 characters).
        title -> Varchar,
        /// Unique URL handle (max 50 characters).
        slug -> Varchar,
        description -> Text,
    }
}

diesel::table! {
    /// Published posts. Feeds read `created_at DESC, id DESC`.
    posts (id) {
        id -> Int8,
        text -> Text,
        /// Publication time, set by the database.
        created_at -> Timestamptz,
        author_id -> Uuid,
        /// Optional group; cleared when the group is deleted.
        group_id -> Nullable<Int8>,
        /// Optional image reference (max 255 bytes).
        image -> Nullable<Varchar>,
    }
}

diesel::table! {
    /// Comments on posts, listed oldest first.
    comments (id) {
        id -> Int8,
        post_id -> Int8,
        author_id -> Uuid,
        text -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Directed follow edges, unique per pair and never reflexive.
    follows (id) {
        id -> Int8,
        /// The reader.
        user_id -> Uuid,
        /// The followed author.
        author_id -> Uuid,
    }
}

diesel::joinable!(posts -> users (author_id));
diesel::joinable!(posts -> groups (group_id));
diesel::joinable!(comments -> posts (post_id));
diesel::joinable!(comments -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(users, groups, posts, comments, follows);

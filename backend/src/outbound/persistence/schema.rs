//! Diesel table definitions for the catalogue schema.
//!
//! These must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Credential store: one row per account, email unique.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    publishers (id) {
        id -> Uuid,
        name -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Series owned by a publisher; deleted with it.
    series (id) {
        id -> Uuid,
        publisher_id -> Uuid,
        name -> Text,
        /// Order within the publisher, as last saved.
        position -> Int4,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    books (id) {
        id -> Uuid,
        series_id -> Uuid,
        issue -> Nullable<Text>,
        alternate_title -> Nullable<Text>,
        format -> Nullable<Text>,
        price_cents -> Nullable<Int4>,
        page_count -> Nullable<Int4>,
        publication_date -> Nullable<Date>,
        summary -> Nullable<Text>,
        age_rating -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    book_formats (id) {
        id -> Uuid,
        name -> Text,
    }
}

diesel::table! {
    creators (id) {
        id -> Uuid,
        name -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    credit_roles (id) {
        id -> Uuid,
        name -> Text,
    }
}

diesel::table! {
    credits (id) {
        id -> Uuid,
        book_id -> Uuid,
        creator_id -> Uuid,
        role_id -> Uuid,
    }
}

diesel::joinable!(series -> publishers (publisher_id));
diesel::joinable!(books -> series (series_id));
diesel::joinable!(credits -> books (book_id));
diesel::joinable!(credits -> creators (creator_id));
diesel::joinable!(credits -> credit_roles (role_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    publishers,
    series,
    books,
    book_formats,
    creators,
    credit_roles,
    credits,
);

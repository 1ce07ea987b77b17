//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `backend/migrations`.
//! `diesel print-schema` regenerates them from a live database.

diesel::table! {
    /// Organisations. Names are unique case-insensitively.
    clients (id) {
        id -> Uuid,
        name -> Varchar,
        /// Remote URL or `/uploads/<name>` path.
        logo -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Accounts with their bcrypt password hash.
    users (id) {
        id -> Uuid,
        username -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        email -> Text,
        job_title -> Nullable<Text>,
        companyname -> Varchar,
        mobile -> Nullable<Varchar>,
        client_id -> Nullable<Uuid>,
        role -> Varchar,
        active -> Bool,
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Form definitions; `fields` holds the ordered field array.
    forms (id) {
        id -> Uuid,
        title -> Text,
        title_color -> Varchar,
        title_alignment -> Varchar,
        fields -> Jsonb,
        created_by -> Uuid,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Submissions keyed by field id.
    form_responses (id) {
        id -> Uuid,
        form_id -> Uuid,
        answers -> Jsonb,
        category -> Nullable<Text>,
        submitted_by -> Nullable<Uuid>,
        client_id -> Nullable<Uuid>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// One builder draft per user.
    form_drafts (user_id) {
        user_id -> Uuid,
        draft -> Jsonb,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(users -> clients (client_id));
diesel::joinable!(forms -> users (created_by));
diesel::joinable!(form_drafts -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(clients, users, forms, form_responses, form_drafts);

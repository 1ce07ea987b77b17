//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{clients, form_drafts, form_responses, forms, users};

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Row struct for reading from the clients table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = clients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ClientRow {
    pub id: Uuid,
    pub name: String,
    pub logo: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for clients.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = clients)]
pub(crate) struct NewClientRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub logo: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Changeset for renaming a client or replacing its logo.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = clients, treat_none_as_null = true)]
pub(crate) struct ClientUpdate<'a> {
    pub name: &'a str,
    pub logo: Option<String>,
}

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub job_title: Option<String>,
    pub companyname: String,
    pub mobile: Option<String>,
    pub client_id: Option<Uuid>,
    pub role: String,
    pub active: bool,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for users.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub job_title: Option<&'a str>,
    pub companyname: &'a str,
    pub mobile: Option<&'a str>,
    pub client_id: Option<Uuid>,
    pub role: &'a str,
    pub active: bool,
    pub password_hash: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Changeset for profile, role and status edits. Password hashes change
/// through a dedicated update.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users, treat_none_as_null = true)]
pub(crate) struct UserProfileUpdate<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub email: &'a str,
    pub job_title: Option<&'a str>,
    pub companyname: &'a str,
    pub mobile: Option<&'a str>,
    pub client_id: Option<Uuid>,
    pub role: &'a str,
    pub active: bool,
}

// ---------------------------------------------------------------------------
// Forms
// ---------------------------------------------------------------------------

/// Row struct for reading from the forms table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = forms)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct FormRow {
    pub id: Uuid,
    pub title: String,
    pub title_color: String,
    pub title_alignment: String,
    pub fields: serde_json::Value,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for forms.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = forms)]
pub(crate) struct NewFormRow<'a> {
    pub id: Uuid,
    pub title: &'a str,
    pub title_color: &'a str,
    pub title_alignment: &'a str,
    pub fields: &'a serde_json::Value,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset replacing a form definition.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = forms)]
pub(crate) struct FormUpdate<'a> {
    pub title: &'a str,
    pub title_color: &'a str,
    pub title_alignment: &'a str,
    pub fields: &'a serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for reading from the form_responses table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = form_responses)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ResponseRow {
    pub id: Uuid,
    pub form_id: Uuid,
    pub answers: serde_json::Value,
    pub category: Option<String>,
    pub submitted_by: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for responses.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = form_responses)]
pub(crate) struct NewResponseRow<'a> {
    pub id: Uuid,
    pub form_id: Uuid,
    pub answers: &'a serde_json::Value,
    pub category: Option<&'a str>,
    pub submitted_by: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Changeset replacing a response's answers.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = form_responses)]
pub(crate) struct ResponseUpdate<'a> {
    pub answers: &'a serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for the form_drafts table, used for reads and upserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = form_drafts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DraftRow {
    pub user_id: Uuid,
    pub draft: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

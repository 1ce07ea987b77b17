//! PostgreSQL-backed `FormRepository`.
//!
//! Fields are stored as a JSONB array and revalidated through the domain
//! constructors when read back.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::UserId;
use crate::domain::forms::{Field, Form, FormDefinition, FormId, TitleAlignment, TitleColor};
use crate::domain::ports::{FormRepository, FormRepositoryError};

use super::diesel_error_mapping::{from_json, map_diesel_error, map_pool_error, to_json};
use super::models::{FormRow, FormUpdate, NewFormRow};
use super::pool::DbPool;
use super::schema::forms;

/// Diesel-backed implementation of [`FormRepository`].
#[derive(Clone)]
pub struct DieselFormRepository {
    pool: DbPool,
}

impl DieselFormRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> FormRepositoryError {
    map_diesel_error(
        error,
        FormRepositoryError::query,
        FormRepositoryError::connection,
    )
}

fn row_to_form(row: FormRow) -> Result<Form, FormRepositoryError> {
    let fields: Vec<Field> = from_json(row.fields, "form fields", FormRepositoryError::query)?;
    let title_color = TitleColor::parse(&row.title_color)
        .map_err(|err| FormRepositoryError::query(err.to_string()))?;
    let title_alignment = TitleAlignment::from_str(&row.title_alignment)
        .map_err(|err| FormRepositoryError::query(err.to_string()))?;
    let definition = FormDefinition::new(Some(&row.title), title_color, title_alignment, fields)
        .map_err(|err| FormRepositoryError::query(err.to_string()))?;
    Ok(Form {
        id: FormId::from_uuid(row.id),
        definition,
        created_by: UserId::from_uuid(row.created_by),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl FormRepository for DieselFormRepository {
    async fn save(&self, form: &Form) -> Result<(), FormRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, FormRepositoryError::connection))?;
        let fields = to_json(
            form.definition.fields(),
            "form fields",
            FormRepositoryError::query,
        )?;
        let definition = &form.definition;
        let new_row = NewFormRow {
            id: *form.id.as_uuid(),
            title: definition.title(),
            title_color: definition.title_color().as_str(),
            title_alignment: definition.title_alignment().as_str(),
            fields: &fields,
            created_by: *form.created_by.as_uuid(),
            created_at: form.created_at,
            updated_at: form.updated_at,
        };
        let update = FormUpdate {
            title: definition.title(),
            title_color: definition.title_color().as_str(),
            title_alignment: definition.title_alignment().as_str(),
            fields: &fields,
            updated_at: form.updated_at,
        };

        diesel::insert_into(forms::table)
            .values(&new_row)
            .on_conflict(forms::id)
            .do_update()
            .set(&update)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn find_by_id(&self, id: &FormId) -> Result<Option<Form>, FormRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, FormRepositoryError::connection))?;
        let row = forms::table
            .filter(forms::id.eq(id.as_uuid()))
            .select(FormRow::as_select())
            .first::<FormRow>(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        row.map(row_to_form).transpose()
    }

    async fn list_by_creator(&self, creator: &UserId) -> Result<Vec<Form>, FormRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, FormRepositoryError::connection))?;
        let rows: Vec<FormRow> = forms::table
            .filter(forms::created_by.eq(creator.as_uuid()))
            .order((forms::created_at.desc(), forms::id.desc()))
            .select(FormRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_error)?;
        rows.into_iter().map(row_to_form).collect()
    }

    async fn delete(&self, id: &FormId) -> Result<bool, FormRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, FormRepositoryError::connection))?;
        let removed = diesel::delete(forms::table.filter(forms::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_error)?;
        Ok(removed > 0)
    }
}

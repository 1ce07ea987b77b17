//! PostgreSQL-backed `ResponseRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::forms::{Answers, FormId, FormResponse, ResponseId};
use crate::domain::ports::{ResponseFilter, ResponseRepository, ResponseRepositoryError};
use crate::domain::{ClientId, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error, to_json};
use super::models::{NewResponseRow, ResponseRow, ResponseUpdate};
use super::pool::DbPool;
use super::schema::form_responses;

/// Diesel-backed implementation of [`ResponseRepository`].
#[derive(Clone)]
pub struct DieselResponseRepository {
    pool: DbPool,
}

impl DieselResponseRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> ResponseRepositoryError {
    map_diesel_error(
        error,
        ResponseRepositoryError::query,
        ResponseRepositoryError::connection,
    )
}

fn row_to_response(row: ResponseRow) -> FormResponse {
    let answers = Answers::from_json_lenient(&row.answers);
    FormResponse {
        id: ResponseId::from_uuid(row.id),
        form_id: FormId::from_uuid(row.form_id),
        answers,
        category: row.category,
        submitted_by: row.submitted_by.map(UserId::from_uuid),
        client_id: row.client_id.map(ClientId::from_uuid),
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

#[async_trait]
impl ResponseRepository for DieselResponseRepository {
    async fn save(&self, response: &FormResponse) -> Result<(), ResponseRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ResponseRepositoryError::connection))?;
        let answers = to_json(&response.answers, "answers", ResponseRepositoryError::query)?;
        let new_row = NewResponseRow {
            id: *response.id.as_uuid(),
            form_id: *response.form_id.as_uuid(),
            answers: &answers,
            category: response.category.as_deref(),
            submitted_by: response.submitted_by.as_ref().map(|id| *id.as_uuid()),
            client_id: response.client_id.map(|id| *id.as_uuid()),
            created_at: response.created_at,
            updated_at: response.updated_at,
        };
        let update = ResponseUpdate {
            answers: &answers,
            updated_at: response.updated_at,
        };

        diesel::insert_into(form_responses::table)
            .values(&new_row)
            .on_conflict(form_responses::id)
            .do_update()
            .set(&update)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn find_by_id(
        &self,
        id: &ResponseId,
    ) -> Result<Option<FormResponse>, ResponseRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ResponseRepositoryError::connection))?;
        let row = form_responses::table
            .filter(form_responses::id.eq(id.as_uuid()))
            .select(ResponseRow::as_select())
            .first::<ResponseRow>(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        Ok(row.map(row_to_response))
    }

    async fn list(
        &self,
        filter: &ResponseFilter,
    ) -> Result<Vec<FormResponse>, ResponseRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ResponseRepositoryError::connection))?;
        let mut query = form_responses::table
            .filter(form_responses::submitted_by.eq(filter.submitted_by.as_uuid()))
            .select(ResponseRow::as_select())
            .into_boxed();
        if let Some(category) = &filter.category {
            query = query.filter(form_responses::category.eq(category));
        }
        let rows: Vec<ResponseRow> = query
            .order((form_responses::created_at.desc(), form_responses::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_error)?;
        Ok(rows.into_iter().map(row_to_response).collect())
    }

    async fn delete(&self, id: &ResponseId) -> Result<bool, ResponseRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ResponseRepositoryError::connection))?;
        let removed =
            diesel::delete(form_responses::table.filter(form_responses::id.eq(id.as_uuid())))
                .execute(&mut conn)
                .await
                .map_err(map_error)?;
        Ok(removed > 0)
    }
}

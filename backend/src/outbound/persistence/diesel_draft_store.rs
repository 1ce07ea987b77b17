//! PostgreSQL-backed `DraftStore`: one JSONB document per user.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;

use crate::domain::UserId;
use crate::domain::forms::FormDraft;
use crate::domain::ports::{DraftStore, DraftStoreError};

use super::diesel_error_mapping::{from_json, map_diesel_error, map_pool_error, to_json};
use super::models::DraftRow;
use super::pool::DbPool;
use super::schema::form_drafts;

/// Diesel-backed implementation of [`DraftStore`].
#[derive(Clone)]
pub struct DieselDraftStore {
    pool: DbPool,
}

impl DieselDraftStore {
    /// Create a store over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> DraftStoreError {
    map_diesel_error(error, DraftStoreError::query, DraftStoreError::connection)
}

#[async_trait]
impl DraftStore for DieselDraftStore {
    async fn load(&self, owner: &UserId) -> Result<Option<FormDraft>, DraftStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, DraftStoreError::connection))?;
        let row = form_drafts::table
            .filter(form_drafts::user_id.eq(owner.as_uuid()))
            .select(DraftRow::as_select())
            .first::<DraftRow>(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        row.map(|row| from_json(row.draft, "draft", DraftStoreError::query))
            .transpose()
    }

    async fn save(&self, owner: &UserId, draft: &FormDraft) -> Result<(), DraftStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, DraftStoreError::connection))?;
        let row = DraftRow {
            user_id: *owner.as_uuid(),
            draft: to_json(draft, "draft", DraftStoreError::query)?,
            updated_at: draft.updated_at.unwrap_or_else(chrono::Utc::now),
        };
        diesel::insert_into(form_drafts::table)
            .values(&row)
            .on_conflict(form_drafts::user_id)
            .do_update()
            .set((
                form_drafts::draft.eq(excluded(form_drafts::draft)),
                form_drafts::updated_at.eq(excluded(form_drafts::updated_at)),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn clear(&self, owner: &UserId) -> Result<(), DraftStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, DraftStoreError::connection))?;
        diesel::delete(form_drafts::table.filter(form_drafts::user_id.eq(owner.as_uuid())))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_error)
    }
}

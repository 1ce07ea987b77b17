//! Builder draft service.
//!
//! Each user owns at most one draft. Command batches are applied atomically:
//! the stored draft only changes when every command in the batch succeeds.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use super::map_draft_store_error;
use crate::domain::forms::{DraftCommand, Form, FormDraft, FormPayload};
use crate::domain::ids::IdGenerator;
use crate::domain::ports::{DraftStore, DraftsCommand, FormsCommand};
use crate::domain::{Caller, Error};

/// Draft service implementing [`DraftsCommand`].
#[derive(Clone)]
pub struct DraftsService<D> {
    drafts: Arc<D>,
    forms: Arc<dyn FormsCommand>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl<D> DraftsService<D> {
    /// Create a draft service that publishes through `forms`.
    pub fn new(
        drafts: Arc<D>,
        forms: Arc<dyn FormsCommand>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            drafts,
            forms,
            ids,
            clock,
        }
    }
}

impl<D: DraftStore> DraftsService<D> {
    async fn stored(&self, caller: &Caller) -> Result<Option<FormDraft>, Error> {
        self.drafts
            .load(&caller.user_id)
            .await
            .map_err(map_draft_store_error)
    }

    async fn persist(&self, caller: &Caller, mut draft: FormDraft) -> Result<FormDraft, Error> {
        draft.updated_at = Some(self.clock.utc());
        self.drafts
            .save(&caller.user_id, &draft)
            .await
            .map_err(map_draft_store_error)?;
        Ok(draft)
    }
}

#[async_trait]
impl<D: DraftStore> DraftsCommand for DraftsService<D> {
    async fn load_draft(&self, caller: &Caller) -> Result<FormDraft, Error> {
        Ok(self.stored(caller).await?.unwrap_or_default())
    }

    async fn apply_commands(
        &self,
        caller: &Caller,
        commands: Vec<DraftCommand>,
    ) -> Result<FormDraft, Error> {
        let current = self.stored(caller).await?.unwrap_or_default();
        let next = current.apply_all(&commands, self.ids.as_ref())?;
        debug!(
            user_id = %caller.user_id,
            commands = commands.len(),
            fields = next.fields.len(),
            "draft edited"
        );
        self.persist(caller, next).await
    }

    async fn replace_draft(&self, caller: &Caller, draft: FormDraft) -> Result<FormDraft, Error> {
        self.persist(caller, draft).await
    }

    async fn save_draft(&self, caller: &Caller) -> Result<Form, Error> {
        let draft = self.stored(caller).await?.unwrap_or_default();
        let payload = FormPayload {
            title: Some(draft.title),
            fields: Some(draft.fields),
            title_color: Some(draft.title_color.as_str().to_owned()),
            title_alignment: Some(draft.title_alignment.as_str().to_owned()),
        };
        let form = self.forms.save_form(caller, payload).await?;
        self.drafts
            .clear(&caller.user_id)
            .await
            .map_err(map_draft_store_error)?;
        info!(user_id = %caller.user_id, form_id = %form.id, "draft published");
        Ok(form)
    }

    async fn clear_draft(&self, caller: &Caller) -> Result<(), Error> {
        self.drafts
            .clear(&caller.user_id)
            .await
            .map_err(map_draft_store_error)
    }
}

#[cfg(test)]
#[path = "drafts_tests.rs"]
mod tests;

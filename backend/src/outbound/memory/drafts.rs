//! In-memory [`DraftStore`].

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::UserId;
use crate::domain::forms::FormDraft;
use crate::domain::ports::{DraftStore, DraftStoreError};

/// One draft per user.
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    drafts: RwLock<HashMap<UserId, FormDraft>>,
}

impl MemoryDraftStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DraftStore for MemoryDraftStore {
    async fn load(&self, owner: &UserId) -> Result<Option<FormDraft>, DraftStoreError> {
        Ok(self.drafts.read().await.get(owner).cloned())
    }

    async fn save(&self, owner: &UserId, draft: &FormDraft) -> Result<(), DraftStoreError> {
        self.drafts
            .write()
            .await
            .insert(owner.clone(), draft.clone());
        Ok(())
    }

    async fn clear(&self, owner: &UserId) -> Result<(), DraftStoreError> {
        self.drafts.write().await.remove(owner);
        Ok(())
    }
}

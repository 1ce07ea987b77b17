//! In-memory [`FormRepository`].

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::UserId;
use crate::domain::forms::{Form, FormId};
use crate::domain::ports::{FormRepository, FormRepositoryError};

/// Forms keyed by id.
#[derive(Debug, Default)]
pub struct MemoryFormRepository {
    forms: RwLock<HashMap<FormId, Form>>,
}

impl MemoryFormRepository {
    /// Empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FormRepository for MemoryFormRepository {
    async fn save(&self, form: &Form) -> Result<(), FormRepositoryError> {
        self.forms.write().await.insert(form.id, form.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &FormId) -> Result<Option<Form>, FormRepositoryError> {
        Ok(self.forms.read().await.get(id).cloned())
    }

    async fn list_by_creator(&self, creator: &UserId) -> Result<Vec<Form>, FormRepositoryError> {
        let mut forms: Vec<Form> = self
            .forms
            .read()
            .await
            .values()
            .filter(|form| &form.created_by == creator)
            .cloned()
            .collect();
        forms.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(forms)
    }

    async fn delete(&self, id: &FormId) -> Result<bool, FormRepositoryError> {
        Ok(self.forms.write().await.remove(id).is_some())
    }
}

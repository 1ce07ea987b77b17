//! In-memory [`ResponseRepository`].

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::forms::{FormResponse, ResponseId};
use crate::domain::ports::{ResponseFilter, ResponseRepository, ResponseRepositoryError};

/// Responses keyed by id.
#[derive(Debug, Default)]
pub struct MemoryResponseRepository {
    responses: RwLock<HashMap<ResponseId, FormResponse>>,
}

impl MemoryResponseRepository {
    /// Empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ResponseRepository for MemoryResponseRepository {
    async fn save(&self, response: &FormResponse) -> Result<(), ResponseRepositoryError> {
        self.responses
            .write()
            .await
            .insert(response.id, response.clone());
        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &ResponseId,
    ) -> Result<Option<FormResponse>, ResponseRepositoryError> {
        Ok(self.responses.read().await.get(id).cloned())
    }

    async fn list(
        &self,
        filter: &ResponseFilter,
    ) -> Result<Vec<FormResponse>, ResponseRepositoryError> {
        let mut responses: Vec<FormResponse> = self
            .responses
            .read()
            .await
            .values()
            .filter(|response| response.submitted_by.as_ref() == Some(&filter.submitted_by))
            .filter(|response| {
                filter
                    .category
                    .as_ref()
                    .is_none_or(|wanted| response.category.as_ref() == Some(wanted))
            })
            .cloned()
            .collect();
        responses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(responses)
    }

    async fn delete(&self, id: &ResponseId) -> Result<bool, ResponseRepositoryError> {
        Ok(self.responses.write().await.remove(id).is_some())
    }
}

//! Port for form response persistence.

use async_trait::async_trait;

use crate::domain::UserId;
use crate::domain::forms::{FormResponse, ResponseId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by response repository adapters.
    pub enum ResponseRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "response repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "response repository query failed: {message}",
    }
}

/// Filter applied when listing responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseFilter {
    /// Only responses submitted by this user.
    pub submitted_by: UserId,
    /// Only responses tagged with this category.
    pub category: Option<String>,
}

/// Port for storing and reading form responses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResponseRepository: Send + Sync {
    /// Insert or fully replace a response. Last writer wins.
    async fn save(&self, response: &FormResponse) -> Result<(), ResponseRepositoryError>;

    /// Find a response by id.
    async fn find_by_id(
        &self,
        id: &ResponseId,
    ) -> Result<Option<FormResponse>, ResponseRepositoryError>;

    /// Responses matching `filter`, newest first.
    async fn list(
        &self,
        filter: &ResponseFilter,
    ) -> Result<Vec<FormResponse>, ResponseRepositoryError>;

    /// Delete a response, returning whether it existed.
    async fn delete(&self, id: &ResponseId) -> Result<bool, ResponseRepositoryError>;
}

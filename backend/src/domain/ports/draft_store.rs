//! Port for per-user builder drafts.

use async_trait::async_trait;

use crate::domain::UserId;
use crate::domain::forms::FormDraft;

use super::define_port_error;

define_port_error! {
    /// Errors raised by draft store adapters.
    pub enum DraftStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "draft store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "draft store query failed: {message}",
    }
}

/// One draft per user, replaced wholesale on every write.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Load the user's draft, if any.
    async fn load(&self, owner: &UserId) -> Result<Option<FormDraft>, DraftStoreError>;

    /// Store the user's draft.
    async fn save(&self, owner: &UserId, draft: &FormDraft) -> Result<(), DraftStoreError>;

    /// Remove the user's draft.
    async fn clear(&self, owner: &UserId) -> Result<(), DraftStoreError>;
}

//! Driving port for the per-user builder draft lifecycle.

use async_trait::async_trait;

use crate::domain::forms::{DraftCommand, Form, FormDraft};
use crate::domain::{Caller, Error};

/// Domain use-case port for builder drafts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DraftsCommand: Send + Sync {
    /// The caller's draft, or an empty one.
    async fn load_draft(&self, caller: &Caller) -> Result<FormDraft, Error>;

    /// Apply commands atomically and store the result.
    async fn apply_commands(
        &self,
        caller: &Caller,
        commands: Vec<DraftCommand>,
    ) -> Result<FormDraft, Error>;

    /// Replace the caller's draft wholesale.
    async fn replace_draft(&self, caller: &Caller, draft: FormDraft) -> Result<FormDraft, Error>;

    /// Save the draft as a form, then clear it.
    async fn save_draft(&self, caller: &Caller) -> Result<Form, Error>;

    /// Discard the caller's draft.
    async fn clear_draft(&self, caller: &Caller) -> Result<(), Error>;
}

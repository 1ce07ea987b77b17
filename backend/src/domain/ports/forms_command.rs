//! Driving port for form definition mutations.

use async_trait::async_trait;

use crate::domain::forms::{Form, FormId, FormPayload};
use crate::domain::{Caller, Error};

/// Domain use-case port for saving, replacing and deleting forms.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FormsCommand: Send + Sync {
    /// Validate and store a new form owned by `caller`.
    async fn save_form(&self, caller: &Caller, payload: FormPayload) -> Result<Form, Error>;

    /// Replace title, presentation and fields of an existing form.
    async fn update_form(
        &self,
        caller: &Caller,
        id: FormId,
        payload: FormPayload,
    ) -> Result<Form, Error>;

    /// Delete a form. Its responses are kept.
    async fn delete_form(&self, caller: &Caller, id: FormId) -> Result<(), Error>;
}

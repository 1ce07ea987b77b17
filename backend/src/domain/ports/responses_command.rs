//! Driving port for response mutations and email delivery.

use async_trait::async_trait;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::forms::{Answers, EmailOutcome, FormId, FormResponse, ResponseId};
use crate::domain::{Caller, Error};

/// Body of a new submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResponse {
    /// Answers keyed by field id.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub answers: Answers,
    /// Report category from the page context.
    #[serde(default)]
    pub category: Option<String>,
}

/// Domain use-case port for response mutations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResponsesCommand: Send + Sync {
    /// Create a new response; every call creates a new record.
    async fn submit_response(
        &self,
        caller: &Caller,
        form_id: FormId,
        submission: SubmitResponse,
    ) -> Result<FormResponse, Error>;

    /// Replace the answers of a response in full.
    async fn update_response(
        &self,
        caller: &Caller,
        id: ResponseId,
        answers: Answers,
    ) -> Result<FormResponse, Error>;

    /// Delete a response.
    async fn delete_response(&self, caller: &Caller, id: ResponseId) -> Result<(), Error>;

    /// Email a response; failures are reported in the outcome.
    async fn email_response(
        &self,
        caller: &Caller,
        id: ResponseId,
        recipient: Option<String>,
    ) -> EmailOutcome;
}

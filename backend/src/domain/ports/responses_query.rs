//! Driving port for response reads.

use async_trait::async_trait;

use crate::domain::forms::{ResponseId, ResponseSummary, ResponseView};
use crate::domain::{Caller, Error};

/// Domain use-case port for reading responses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResponsesQuery: Send + Sync {
    /// The caller's responses, newest first, optionally filtered by category.
    async fn list_responses(
        &self,
        caller: &Caller,
        category: Option<String>,
    ) -> Result<Vec<ResponseSummary>, Error>;

    /// One response with its current form definition, if still present.
    async fn get_response(&self, caller: &Caller, id: ResponseId) -> Result<ResponseView, Error>;

    /// Standalone HTML report of a response.
    async fn response_report(&self, caller: &Caller, id: ResponseId) -> Result<String, Error>;
}

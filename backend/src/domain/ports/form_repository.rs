//! Port for form definition persistence.

use async_trait::async_trait;

use crate::domain::UserId;
use crate::domain::forms::{Form, FormId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by form repository adapters.
    pub enum FormRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "form repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "form repository query failed: {message}",
    }
}

/// Port for storing and reading form definitions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FormRepository: Send + Sync {
    /// Insert or fully replace a form.
    async fn save(&self, form: &Form) -> Result<(), FormRepositoryError>;

    /// Find a form by id.
    async fn find_by_id(&self, id: &FormId) -> Result<Option<Form>, FormRepositoryError>;

    /// Forms created by `creator`, newest first.
    async fn list_by_creator(&self, creator: &UserId) -> Result<Vec<Form>, FormRepositoryError>;

    /// Delete a form, returning whether it existed. Responses are untouched.
    async fn delete(&self, id: &FormId) -> Result<bool, FormRepositoryError>;
}

//! Driving port for form reads and rendering.

use async_trait::async_trait;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::forms::{Answers, Form, FormId, FormWithOwner, RenderMode, RenderedForm};
use crate::domain::{Caller, Error};

/// Values and mode for a server-side render.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    /// Current values keyed by field id.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub values: Answers,
    /// Editable or read-only.
    #[serde(default)]
    pub mode: RenderMode,
}

/// Domain use-case port for reading forms.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FormsQuery: Send + Sync {
    /// Forms created by `caller`, newest first.
    async fn list_forms(&self, caller: &Caller) -> Result<Vec<Form>, Error>;

    /// A form with its creator's organisation branding.
    async fn get_form(&self, id: FormId) -> Result<FormWithOwner, Error>;

    /// Render a form with the given values.
    async fn render_form(&self, id: FormId, request: RenderRequest) -> Result<RenderedForm, Error>;
}

//! Driving port for organisation management.

use async_trait::async_trait;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::domain::{Caller, Client, ClientId, Error};

/// Client create or update body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientPayload {
    /// Organisation name.
    #[serde(default)]
    pub name: Option<String>,
    /// Logo URL or `/uploads/...` path; an empty string removes the logo.
    #[serde(default)]
    pub logo: Option<String>,
}

/// Domain use-case port for changing organisations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientsCommand: Send + Sync {
    /// Create a client.
    async fn create_client(&self, caller: &Caller, payload: ClientPayload) -> Result<Client, Error>;

    /// Rename a client or replace its logo.
    async fn update_client(
        &self,
        caller: &Caller,
        id: ClientId,
        payload: ClientPayload,
    ) -> Result<Client, Error>;

    /// Delete a client.
    async fn delete_client(&self, caller: &Caller, id: ClientId) -> Result<(), Error>;
}

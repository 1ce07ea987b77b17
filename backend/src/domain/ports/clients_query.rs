//! Driving port for organisation reads.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Caller, Client, ClientId, Error, User};

/// Users of one organisation, plus everyone for platform-wide callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientUsers {
    /// The organisation.
    pub client: Client,
    /// Its members.
    pub users: Vec<User>,
    /// Every user, when the caller is platform-wide; otherwise the members.
    pub all_users: Vec<User>,
}

/// Domain use-case port for reading organisations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientsQuery: Send + Sync {
    /// Visible clients, newest first, optionally filtered by exact name.
    async fn list_clients(&self, caller: &Caller, name: Option<String>)
    -> Result<Vec<Client>, Error>;

    /// One visible client.
    async fn get_client(&self, caller: &Caller, id: ClientId) -> Result<Client, Error>;

    /// A client's users.
    async fn users_for_client(&self, caller: &Caller, id: ClientId) -> Result<ClientUsers, Error>;
}

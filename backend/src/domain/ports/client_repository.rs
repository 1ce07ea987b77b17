//! Port for client (organisation) persistence.

use async_trait::async_trait;

use crate::domain::{Client, ClientId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by client repository adapters.
    pub enum ClientRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "client repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "client repository query failed: {message}",
        /// The client name is already taken.
        Conflict { message: String } => "client already exists: {message}",
    }
}

/// Port for organisation records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ClientRepository: Send + Sync {
    /// Insert a client. A case-insensitive duplicate name yields `Conflict`.
    async fn create(&self, client: &Client) -> Result<(), ClientRepositoryError>;

    /// Find a client by id.
    async fn find_by_id(&self, id: ClientId) -> Result<Option<Client>, ClientRepositoryError>;

    /// Find a client by case-insensitive name.
    async fn find_by_name(&self, name: &str) -> Result<Option<Client>, ClientRepositoryError>;

    /// All clients, newest first.
    async fn list(&self) -> Result<Vec<Client>, ClientRepositoryError>;

    /// Replace a client's name and logo.
    async fn update(&self, client: &Client) -> Result<(), ClientRepositoryError>;

    /// Delete a client, returning whether it existed.
    async fn delete(&self, id: ClientId) -> Result<bool, ClientRepositoryError>;
}

//! In-memory [`ClientRepository`].

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{ClientRepository, ClientRepositoryError};
use crate::domain::{Client, ClientId};

const NAME_CONSTRAINT: &str = "clients_name_key";

/// Clients keyed by id; names are unique case-insensitively.
#[derive(Debug, Default)]
pub struct MemoryClientRepository {
    clients: RwLock<HashMap<ClientId, Client>>,
}

impl MemoryClientRepository {
    /// Empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

fn name_taken(clients: &HashMap<ClientId, Client>, candidate: &Client) -> bool {
    clients
        .values()
        .any(|other| other.id != candidate.id && other.name.matches(candidate.name.as_str()))
}

#[async_trait]
impl ClientRepository for MemoryClientRepository {
    async fn create(&self, client: &Client) -> Result<(), ClientRepositoryError> {
        let mut clients = self.clients.write().await;
        if name_taken(&clients, client) {
            return Err(ClientRepositoryError::conflict(NAME_CONSTRAINT));
        }
        clients.insert(client.id, client.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: ClientId) -> Result<Option<Client>, ClientRepositoryError> {
        Ok(self.clients.read().await.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Client>, ClientRepositoryError> {
        Ok(self
            .clients
            .read()
            .await
            .values()
            .find(|client| client.name.matches(name))
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Client>, ClientRepositoryError> {
        let mut clients: Vec<Client> = self.clients.read().await.values().cloned().collect();
        clients.sort_by(|a, b| a.name.as_str().cmp(b.name.as_str()));
        Ok(clients)
    }

    async fn update(&self, client: &Client) -> Result<(), ClientRepositoryError> {
        let mut clients = self.clients.write().await;
        if name_taken(&clients, client) {
            return Err(ClientRepositoryError::conflict(NAME_CONSTRAINT));
        }
        if let Some(stored) = clients.get_mut(&client.id) {
            *stored = client.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: ClientId) -> Result<bool, ClientRepositoryError> {
        Ok(self.clients.write().await.remove(&id).is_some())
    }
}

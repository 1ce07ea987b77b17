//! Organisation (client) service.
//!
//! Logos are either remote URLs or files in the upload store. Replacing or
//! clearing an uploaded logo removes the old file; failures to remove are
//! logged and do not fail the update.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use super::{map_client_repository_error, map_user_repository_error};
use crate::domain::ports::{
    ClientPayload, ClientRepository, ClientUsers, ClientsCommand, ClientsQuery, FileStore,
    UserRepository,
};
use crate::domain::{
    AccessPolicy, Caller, Client, ClientId, ClientName, ClientValidationError, Error, LogoRef,
    Role,
};

const CLIENT_NOT_FOUND: &str = "Client not found";

fn invalid(error: ClientValidationError) -> Error {
    Error::invalid_request(error.to_string())
}

/// Parse an optional logo; blank clears it.
fn parse_logo(raw: &str) -> Result<Option<LogoRef>, Error> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    LogoRef::parse(trimmed).map(Some).map_err(invalid)
}

/// Client service implementing [`ClientsQuery`] and [`ClientsCommand`].
#[derive(Clone)]
pub struct ClientsService<C, U, S: ?Sized> {
    clients: Arc<C>,
    users: Arc<U>,
    files: Arc<S>,
    policy: AccessPolicy,
    clock: Arc<dyn Clock>,
}

impl<C, U, S: ?Sized> ClientsService<C, U, S> {
    /// Create a client service.
    pub fn new(
        clients: Arc<C>,
        users: Arc<U>,
        files: Arc<S>,
        policy: AccessPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            clients,
            users,
            files,
            policy,
            clock,
        }
    }
}

impl<C, U, S> ClientsService<C, U, S>
where
    C: ClientRepository,
    U: UserRepository,
    S: FileStore + ?Sized,
{
    async fn existing(&self, id: ClientId) -> Result<Client, Error> {
        self.clients
            .find_by_id(id)
            .await
            .map_err(map_client_repository_error)?
            .ok_or_else(|| Error::not_found(CLIENT_NOT_FOUND))
    }

    async fn discard_logo(&self, logo: Option<&LogoRef>) {
        let Some(name) = logo.and_then(LogoRef::upload_name) else {
            return;
        };
        if let Err(error) = self.files.remove(name).await {
            warn!(%error, upload = name, "failed to remove replaced logo");
        }
    }
}

#[async_trait]
impl<C, U, S> ClientsQuery for ClientsService<C, U, S>
where
    C: ClientRepository,
    U: UserRepository,
    S: FileStore + ?Sized,
{
    async fn list_clients(
        &self,
        caller: &Caller,
        name: Option<String>,
    ) -> Result<Vec<Client>, Error> {
        let name = name
            .map(|raw| raw.trim().to_owned())
            .filter(|value| !value.is_empty());
        let mut clients: Vec<Client> = self
            .clients
            .list()
            .await
            .map_err(map_client_repository_error)?
            .into_iter()
            .filter(|client| self.policy.can_see_client(caller, client.id))
            .filter(|client| name.as_deref().is_none_or(|wanted| client.name.matches(wanted)))
            .collect();
        clients.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(clients)
    }

    async fn get_client(&self, caller: &Caller, id: ClientId) -> Result<Client, Error> {
        if !self.policy.can_see_client(caller, id) {
            return Err(Error::forbidden("You cannot view this client"));
        }
        self.existing(id).await
    }

    async fn users_for_client(&self, caller: &Caller, id: ClientId) -> Result<ClientUsers, Error> {
        let client = self.get_client(caller, id).await?;
        let all_users = self
            .users
            .list()
            .await
            .map_err(map_user_repository_error)?;
        let users = all_users
            .iter()
            .filter(|user| {
                user.client_id == Some(id)
                    || (user.client_id.is_none() && client.name.matches(&user.companyname))
            })
            .cloned()
            .collect::<Vec<_>>();
        let all_users = if self.policy.is_platform_wide(caller) {
            all_users
        } else {
            users.clone()
        };
        Ok(ClientUsers {
            client,
            users,
            all_users,
        })
    }
}

#[async_trait]
impl<C, U, S> ClientsCommand for ClientsService<C, U, S>
where
    C: ClientRepository,
    U: UserRepository,
    S: FileStore + ?Sized,
{
    async fn create_client(&self, caller: &Caller, payload: ClientPayload) -> Result<Client, Error> {
        if !self.policy.can_create_clients(caller) {
            return Err(Error::forbidden("Only admins can create clients"));
        }
        let name = ClientName::new(payload.name.unwrap_or_default()).map_err(invalid)?;
        let logo = match payload.logo.as_deref() {
            Some(raw) => parse_logo(raw)?,
            None => None,
        };
        let client = Client {
            id: ClientId::random(),
            name,
            logo,
            created_at: self.clock.utc(),
        };
        self.clients
            .create(&client)
            .await
            .map_err(map_client_repository_error)?;
        info!(client_id = %client.id, "client created");
        Ok(client)
    }

    async fn update_client(
        &self,
        caller: &Caller,
        id: ClientId,
        payload: ClientPayload,
    ) -> Result<Client, Error> {
        if !self.policy.can_manage_client(caller, id) {
            return Err(Error::forbidden("You cannot manage this client"));
        }
        let existing = self.existing(id).await?;
        let mut client = existing.clone();
        if let Some(raw) = payload.name.as_deref() {
            client.name = ClientName::new(raw).map_err(invalid)?;
        }
        if let Some(raw) = payload.logo.as_deref() {
            client.logo = parse_logo(raw)?;
        }
        self.clients
            .update(&client)
            .await
            .map_err(map_client_repository_error)?;
        if existing.logo != client.logo {
            self.discard_logo(existing.logo.as_ref()).await;
        }
        info!(client_id = %id, "client updated");
        Ok(client)
    }

    async fn delete_client(&self, caller: &Caller, id: ClientId) -> Result<(), Error> {
        if !(self.policy.is_platform_wide(caller) && caller.role.is_at_least(Role::Admin)) {
            return Err(Error::forbidden("Only platform admins can delete clients"));
        }
        let existing = self.existing(id).await?;
        let removed = self
            .clients
            .delete(id)
            .await
            .map_err(map_client_repository_error)?;
        if !removed {
            return Err(Error::not_found(CLIENT_NOT_FOUND));
        }
        self.discard_logo(existing.logo.as_ref()).await;
        info!(client_id = %id, "client deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "clients_tests.rs"]
mod tests;

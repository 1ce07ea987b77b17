//! Sign-in and sign-up service.
//!
//! Registration resolves the typed company name to an existing client
//! case-insensitively and creates the client when none matches, so every
//! registered user belongs to exactly one organisation.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use super::{map_client_repository_error, map_password_error, map_user_repository_error};
use crate::domain::ports::{
    ClientRepository, ClientRepositoryError, LoginService, PasswordHasher, UserRepository,
};
use crate::domain::{
    Client, ClientId, ClientName, Error, LoginCredentials, Registration, Role, User, UserId,
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";
const BLOCKED: &str = "User is blocked. Please contact your administrator.";

/// Account service implementing [`LoginService`].
#[derive(Clone)]
pub struct AccountService<U, C, H> {
    users: Arc<U>,
    clients: Arc<C>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
}

impl<U, C, H> AccountService<U, C, H> {
    /// Create an account service.
    pub fn new(users: Arc<U>, clients: Arc<C>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            users,
            clients,
            hasher,
            clock,
        }
    }
}

impl<U, C, H> AccountService<U, C, H>
where
    U: UserRepository,
    C: ClientRepository,
    H: PasswordHasher,
{
    /// Find or create the client named `name`; the flag is `true` when
    /// this call created it.
    async fn resolve_client(&self, name: &ClientName) -> Result<(Client, bool), Error> {
        if let Some(existing) = self
            .clients
            .find_by_name(name.as_str())
            .await
            .map_err(map_client_repository_error)?
        {
            return Ok((existing, false));
        }
        let client = Client {
            id: ClientId::random(),
            name: name.clone(),
            logo: None,
            created_at: self.clock.utc(),
        };
        match self.clients.create(&client).await {
            Ok(()) => {
                info!(client_id = %client.id, "client created during registration");
                Ok((client, true))
            }
            // A concurrent registration created the same organisation.
            Err(ClientRepositoryError::Conflict { .. }) => self
                .clients
                .find_by_name(name.as_str())
                .await
                .map_err(map_client_repository_error)?
                .map(|client| (client, false))
                .ok_or_else(|| Error::conflict("Client with this name already exists")),
            Err(other) => Err(map_client_repository_error(other)),
        }
    }

    /// Remove a client created for a registration that did not complete.
    async fn discard_client(&self, client: &Client) {
        match self.clients.delete(client.id).await {
            Ok(_) => info!(client_id = %client.id, "client discarded after failed registration"),
            Err(error) => warn!(
                client_id = %client.id,
                %error,
                "failed to discard client after failed registration"
            ),
        }
    }
}

#[async_trait]
impl<U, C, H> LoginService for AccountService<U, C, H>
where
    U: UserRepository,
    C: ClientRepository,
    H: PasswordHasher,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let Some(stored) = self
            .users
            .find_credentials(credentials.identifier())
            .await
            .map_err(map_user_repository_error)?
        else {
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };
        let matches = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .map_err(map_password_error)?;
        if !matches {
            warn!(user_id = %stored.user.id, "password mismatch");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }
        if !stored.user.active {
            return Err(Error::forbidden(BLOCKED));
        }
        Ok(stored.user)
    }

    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let password_hash = self
            .hasher
            .hash(&registration.password)
            .map_err(map_password_error)?;
        let (client, created) = self.resolve_client(&registration.company).await?;
        let user = User {
            id: UserId::random(),
            username: registration.username,
            first_name: registration.first_name,
            last_name: registration.last_name,
            email: registration.email,
            job_title: registration.job_title,
            companyname: client.name.to_string(),
            mobile: registration.mobile,
            client_id: Some(client.id),
            role: Role::User,
            active: true,
            created_at: self.clock.utc(),
        };
        if let Err(error) = self.users.create(&user, &password_hash).await {
            if created {
                self.discard_client(&client).await;
            }
            return Err(map_user_repository_error(error));
        }
        info!(user_id = %user.id, client_id = %client.id, "user registered");
        Ok(user)
    }
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;

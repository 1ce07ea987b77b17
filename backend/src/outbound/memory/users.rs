//! In-memory [`UserRepository`].

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{StoredCredentials, UserRepository, UserRepositoryError};
use crate::domain::{LoginIdentifier, User, UserId};

/// Accounts with their password hashes.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    users: RwLock<HashMap<UserId, StoredCredentials>>,
}

impl MemoryUserRepository {
    /// Empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

/// Name of the unique constraint `candidate` would violate, if any.
fn violated_constraint<'a>(
    existing: impl IntoIterator<Item = &'a StoredCredentials>,
    candidate: &User,
) -> Option<&'static str> {
    existing
        .into_iter()
        .filter(|stored| stored.user.id != candidate.id)
        .find_map(|stored| {
            if stored.user.email == candidate.email {
                Some("users_email_key")
            } else if stored.user.username == candidate.username {
                Some("users_username_key")
            } else {
                None
            }
        })
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: &User, password_hash: &str) -> Result<(), UserRepositoryError> {
        let mut users = self.users.write().await;
        if let Some(constraint) = violated_constraint(users.values(), user) {
            return Err(UserRepositoryError::conflict(constraint));
        }
        users.insert(
            user.id.clone(),
            StoredCredentials {
                user: user.clone(),
                password_hash: password_hash.to_owned(),
            },
        );
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        Ok(self
            .users
            .read()
            .await
            .get(id)
            .map(|stored| stored.user.clone()))
    }

    async fn find_credentials(
        &self,
        identifier: &LoginIdentifier,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let users = self.users.read().await;
        let found = users.values().find(|stored| match identifier {
            LoginIdentifier::Email(email) => &stored.user.email == email,
            LoginIdentifier::Username(username) => &stored.user.username == username,
        });
        Ok(found.cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let mut users: Vec<User> = self
            .users
            .read()
            .await
            .values()
            .map(|stored| stored.user.clone())
            .collect();
        users.sort_by(|a, b| {
            (&a.last_name, &a.first_name, a.id.as_uuid())
                .cmp(&(&b.last_name, &b.first_name, b.id.as_uuid()))
        });
        Ok(users)
    }

    async fn update(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut users = self.users.write().await;
        if let Some(constraint) = violated_constraint(users.values(), user) {
            return Err(UserRepositoryError::conflict(constraint));
        }
        if let Some(stored) = users.get_mut(&user.id) {
            stored.user = user.clone();
        }
        Ok(())
    }

    async fn set_password_hash(
        &self,
        id: &UserId,
        password_hash: &str,
    ) -> Result<(), UserRepositoryError> {
        if let Some(stored) = self.users.write().await.get_mut(id) {
            password_hash.clone_into(&mut stored.password_hash);
        }
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError> {
        Ok(self.users.write().await.remove(id).is_some())
    }
}

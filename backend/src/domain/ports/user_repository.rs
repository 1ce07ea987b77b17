//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{LoginIdentifier, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A unique column (email or username) is already taken.
        Conflict { message: String } => "user already exists: {message}",
    }
}

/// A user record together with its password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    /// Account.
    pub user: User,
    /// Password hash.
    pub password_hash: String,
}

/// Port for account persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user. Duplicate emails or usernames yield `Conflict`.
    async fn create(&self, user: &User, password_hash: &str) -> Result<(), UserRepositoryError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError>;

    /// Fetch a user and hash by email (case-insensitive) or username.
    async fn find_credentials(
        &self,
        identifier: &LoginIdentifier,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError>;

    /// All users ordered by last name, then first name.
    async fn list(&self) -> Result<Vec<User>, UserRepositoryError>;

    /// Replace a user's profile fields, role and status.
    async fn update(&self, user: &User) -> Result<(), UserRepositoryError>;

    /// Replace a user's password hash.
    async fn set_password_hash(
        &self,
        id: &UserId,
        password_hash: &str,
    ) -> Result<(), UserRepositoryError>;

    /// Delete a user, returning whether it existed.
    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError>;
}

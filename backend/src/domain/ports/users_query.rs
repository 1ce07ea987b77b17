//! Driving port for user-facing queries.

use async_trait::async_trait;

use crate::domain::{Caller, Error, User, UserId};

/// Domain use-case port for reading users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Users visible to `caller`, newest first.
    async fn list_users(&self, caller: &Caller) -> Result<Vec<User>, Error>;

    /// One user visible to `caller`.
    async fn get_user(&self, caller: &Caller, id: &UserId) -> Result<User, Error>;
}

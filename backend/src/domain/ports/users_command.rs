//! Driving port for user management.

use async_trait::async_trait;

use crate::domain::{Caller, Error, User, UserId, UserUpdate};

/// Domain use-case port for changing users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Apply profile changes; role changes need an admin.
    async fn update_user(
        &self,
        caller: &Caller,
        id: &UserId,
        update: UserUpdate,
    ) -> Result<User, Error>;

    /// Activate or block a user.
    async fn set_user_status(&self, caller: &Caller, id: &UserId, active: bool)
    -> Result<User, Error>;

    /// Delete a user.
    async fn delete_user(&self, caller: &Caller, id: &UserId) -> Result<(), Error>;
}

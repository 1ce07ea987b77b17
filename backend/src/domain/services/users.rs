//! User administration service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use super::{map_password_error, map_user_repository_error};
use crate::domain::accounts::credentials::PASSWORD_MIN_LEN;
use crate::domain::ports::{PasswordHasher, UserRepository, UsersCommand, UsersQuery};
use crate::domain::{
    AccessPolicy, Caller, Error, User, UserId, UserUpdate, UserValidationError, validate_email,
    validate_mobile, validate_person_name,
};

const USER_NOT_FOUND: &str = "User not found";

fn invalid(error: UserValidationError) -> Error {
    Error::invalid_request(error.to_string())
}

/// Apply profile changes to `user`, validating each supplied field.
fn apply_profile(user: &mut User, update: &UserUpdate) -> Result<(), Error> {
    if let Some(first_name) = &update.first_name {
        user.first_name = validate_person_name("firstName", first_name).map_err(invalid)?;
    }
    if let Some(last_name) = &update.last_name {
        user.last_name = validate_person_name("lastName", last_name).map_err(invalid)?;
    }
    if let Some(email) = &update.email {
        user.email = validate_email(email).map_err(invalid)?;
    }
    if let Some(mobile) = &update.mobile {
        user.mobile = validate_mobile(Some(mobile)).map_err(invalid)?;
    }
    if let Some(job_title) = &update.job_title {
        let trimmed = job_title.trim();
        user.job_title = (!trimmed.is_empty()).then(|| trimmed.to_owned());
    }
    Ok(())
}

/// User service implementing [`UsersQuery`] and [`UsersCommand`].
#[derive(Clone)]
pub struct UsersService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
    policy: AccessPolicy,
}

impl<U, H> UsersService<U, H> {
    /// Create a user service.
    pub fn new(users: Arc<U>, hasher: Arc<H>, policy: AccessPolicy) -> Self {
        Self {
            users,
            hasher,
            policy,
        }
    }
}

impl<U, H> UsersService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn existing(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(map_user_repository_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND))
    }

    async fn managed(&self, caller: &Caller, id: &UserId) -> Result<User, Error> {
        let target = self.existing(id).await?;
        if !self.policy.can_manage_user(caller, &target) {
            return Err(Error::forbidden("You cannot manage this user"));
        }
        Ok(target)
    }
}

#[async_trait]
impl<U, H> UsersQuery for UsersService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn list_users(&self, caller: &Caller) -> Result<Vec<User>, Error> {
        let users = self
            .users
            .list()
            .await
            .map_err(map_user_repository_error)?;
        Ok(self.policy.scope_users(caller, users))
    }

    async fn get_user(&self, caller: &Caller, id: &UserId) -> Result<User, Error> {
        let user = self.existing(id).await?;
        if !self.policy.can_see_user(caller, &user) {
            return Err(Error::forbidden("You cannot view this user"));
        }
        Ok(user)
    }
}

#[async_trait]
impl<U, H> UsersCommand for UsersService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn update_user(
        &self,
        caller: &Caller,
        id: &UserId,
        update: UserUpdate,
    ) -> Result<User, Error> {
        let mut user = self.existing(id).await?;
        if !self.policy.can_edit_profile(caller, &user) {
            return Err(Error::forbidden("You cannot edit this user"));
        }
        if let Some(role) = update.role.filter(|role| *role != user.role) {
            if !self.policy.can_manage_user(caller, &user) || role > caller.role {
                return Err(Error::forbidden("Only admins can change roles"));
            }
            user.role = role;
        }
        apply_profile(&mut user, &update)?;

        let password_hash = match update.password.as_deref() {
            Some(password) if password.chars().count() < PASSWORD_MIN_LEN => {
                return Err(Error::invalid_request(format!(
                    "password must be at least {PASSWORD_MIN_LEN} characters"
                )));
            }
            Some(password) => Some(self.hasher.hash(password).map_err(map_password_error)?),
            None => None,
        };

        self.users
            .update(&user)
            .await
            .map_err(map_user_repository_error)?;
        if let Some(hash) = password_hash {
            self.users
                .set_password_hash(&user.id, &hash)
                .await
                .map_err(map_user_repository_error)?;
        }
        info!(user_id = %user.id, "user updated");
        Ok(user)
    }

    async fn set_user_status(
        &self,
        caller: &Caller,
        id: &UserId,
        active: bool,
    ) -> Result<User, Error> {
        if &caller.user_id == id {
            return Err(Error::forbidden("You cannot change your own status"));
        }
        let mut user = self.managed(caller, id).await?;
        user.active = active;
        self.users
            .update(&user)
            .await
            .map_err(map_user_repository_error)?;
        info!(user_id = %user.id, active, "user status changed");
        Ok(user)
    }

    async fn delete_user(&self, caller: &Caller, id: &UserId) -> Result<(), Error> {
        self.managed(caller, id).await?;
        let removed = self
            .users
            .delete(id)
            .await
            .map_err(map_user_repository_error)?;
        if !removed {
            return Err(Error::not_found(USER_NOT_FOUND));
        }
        info!(user_id = %id, "user deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "users_tests.rs"]
mod tests;

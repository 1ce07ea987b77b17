//! PostgreSQL-backed `UserRepository`.
//!
//! Unique violations on username or email surface as
//! [`UserRepositoryError::Conflict`] carrying the constraint name.

use std::str::FromStr;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{StoredCredentials, UserRepository, UserRepositoryError};
use crate::domain::{ClientId, LoginIdentifier, Role, User, UserId};

use super::diesel_error_mapping::{map_diesel_error_with_conflict, map_pool_error};
use super::models::{NewUserRow, UserProfileUpdate, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of [`UserRepository`].
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> UserRepositoryError {
    map_diesel_error_with_conflict(
        error,
        UserRepositoryError::query,
        UserRepositoryError::connection,
        UserRepositoryError::conflict,
    )
}

fn row_to_credentials(row: UserRow) -> Result<StoredCredentials, UserRepositoryError> {
    let role = Role::from_str(&row.role).map_err(|err| UserRepositoryError::query(err.to_string()))?;
    Ok(StoredCredentials {
        user: User {
            id: UserId::from_uuid(row.id),
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            job_title: row.job_title,
            companyname: row.companyname,
            mobile: row.mobile,
            client_id: row.client_id.map(ClientId::from_uuid),
            role,
            active: row.active,
            created_at: row.created_at,
        },
        password_hash: row.password_hash,
    })
}

fn row_to_user(row: UserRow) -> Result<User, UserRepositoryError> {
    row_to_credentials(row).map(|stored| stored.user)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &User, password_hash: &str) -> Result<(), UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserRepositoryError::connection))?;
        let row = NewUserRow {
            id: *user.id.as_uuid(),
            username: &user.username,
            first_name: &user.first_name,
            last_name: &user.last_name,
            email: &user.email,
            job_title: user.job_title.as_deref(),
            companyname: &user.companyname,
            mobile: user.mobile.as_deref(),
            client_id: user.client_id.map(|id| *id.as_uuid()),
            role: user.role.as_str(),
            active: user.active,
            password_hash,
            created_at: user.created_at,
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserRepositoryError::connection))?;
        let row = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_credentials(
        &self,
        identifier: &LoginIdentifier,
    ) -> Result<Option<StoredCredentials>, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserRepositoryError::connection))?;
        let query = users::table.select(UserRow::as_select()).into_boxed();
        let query = match identifier {
            LoginIdentifier::Email(email) => query.filter(users::email.eq(email)),
            LoginIdentifier::Username(username) => query.filter(users::username.eq(username)),
        };
        let row = query
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        row.map(row_to_credentials).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserRepositoryError::connection))?;
        let rows: Vec<UserRow> = users::table
            .order((users::last_name.asc(), users::first_name.asc(), users::id.asc()))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_error)?;
        rows.into_iter().map(row_to_user).collect()
    }

    async fn update(&self, user: &User) -> Result<(), UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserRepositoryError::connection))?;
        let changes = UserProfileUpdate {
            first_name: &user.first_name,
            last_name: &user.last_name,
            email: &user.email,
            job_title: user.job_title.as_deref(),
            companyname: &user.companyname,
            mobile: user.mobile.as_deref(),
            client_id: user.client_id.map(|id| *id.as_uuid()),
            role: user.role.as_str(),
            active: user.active,
        };
        diesel::update(users::table.filter(users::id.eq(user.id.as_uuid())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn set_password_hash(
        &self,
        id: &UserId,
        password_hash: &str,
    ) -> Result<(), UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserRepositoryError::connection))?;
        diesel::update(users::table.filter(users::id.eq(id.as_uuid())))
            .set(users::password_hash.eq(password_hash))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn delete(&self, id: &UserId) -> Result<bool, UserRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, UserRepositoryError::connection))?;
        let removed = diesel::delete(users::table.filter(users::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_error)?;
        Ok(removed > 0)
    }
}

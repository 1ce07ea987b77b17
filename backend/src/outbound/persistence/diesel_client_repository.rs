//! PostgreSQL-backed `ClientRepository`.
//!
//! Names are unique case-insensitively through the `clients_name_key` index
//! on `lower(name)`; lookups by name compare lowercased text as well.

use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::Text;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ClientRepository, ClientRepositoryError};
use crate::domain::{Client, ClientId, ClientName, LogoRef};

use super::diesel_error_mapping::{map_diesel_error_with_conflict, map_pool_error};
use super::models::{ClientRow, ClientUpdate, NewClientRow};
use super::pool::DbPool;
use super::schema::clients;

/// Diesel-backed implementation of [`ClientRepository`].
#[derive(Clone)]
pub struct DieselClientRepository {
    pool: DbPool,
}

impl DieselClientRepository {
    /// Create a repository over `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> ClientRepositoryError {
    map_diesel_error_with_conflict(
        error,
        ClientRepositoryError::query,
        ClientRepositoryError::connection,
        ClientRepositoryError::conflict,
    )
}

fn row_to_client(row: ClientRow) -> Result<Client, ClientRepositoryError> {
    let name =
        ClientName::new(&row.name).map_err(|err| ClientRepositoryError::query(err.to_string()))?;
    let logo = row
        .logo
        .as_deref()
        .map(LogoRef::parse)
        .transpose()
        .map_err(|err| ClientRepositoryError::query(err.to_string()))?;
    Ok(Client {
        id: ClientId::from_uuid(row.id),
        name,
        logo,
        created_at: row.created_at,
    })
}

#[async_trait]
impl ClientRepository for DieselClientRepository {
    async fn create(&self, client: &Client) -> Result<(), ClientRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ClientRepositoryError::connection))?;
        let row = NewClientRow {
            id: *client.id.as_uuid(),
            name: client.name.as_str(),
            logo: client.logo.as_ref().map(LogoRef::as_string),
            created_at: client.created_at,
        };
        diesel::insert_into(clients::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn find_by_id(&self, id: ClientId) -> Result<Option<Client>, ClientRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ClientRepositoryError::connection))?;
        let row = clients::table
            .filter(clients::id.eq(id.as_uuid()))
            .select(ClientRow::as_select())
            .first::<ClientRow>(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        row.map(row_to_client).transpose()
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<Client>, ClientRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ClientRepositoryError::connection))?;
        let wanted = name.trim().to_lowercase();
        let row = clients::table
            .filter(sql::<Text>("lower(name)").eq(wanted))
            .select(ClientRow::as_select())
            .first::<ClientRow>(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;
        row.map(row_to_client).transpose()
    }

    async fn list(&self) -> Result<Vec<Client>, ClientRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ClientRepositoryError::connection))?;
        let rows: Vec<ClientRow> = clients::table
            .order(clients::name.asc())
            .select(ClientRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_error)?;
        rows.into_iter().map(row_to_client).collect()
    }

    async fn update(&self, client: &Client) -> Result<(), ClientRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ClientRepositoryError::connection))?;
        let changes = ClientUpdate {
            name: client.name.as_str(),
            logo: client.logo.as_ref().map(LogoRef::as_string),
        };
        diesel::update(clients::table.filter(clients::id.eq(client.id.as_uuid())))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_error)
    }

    async fn delete(&self, id: ClientId) -> Result<bool, ClientRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, ClientRepositoryError::connection))?;
        let removed = diesel::delete(clients::table.filter(clients::id.eq(id.as_uuid())))
            .execute(&mut conn)
            .await
            .map_err(map_error)?;
        Ok(removed > 0)
    }
}

//! Organisation (client) handlers.
//!
//! ```text
//! GET /api/v1/clients?name=Acme
//! POST /api/v1/clients {"name":"Acme","logo":"/uploads/1714555800000-a1b2c3.png"}
//! GET /api/v1/clients/{id}
//! PUT /api/v1/clients/{id}
//! DELETE /api/v1/clients/{id}
//! GET /api/v1/clients/{id}/users
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;

use crate::domain::ports::{ClientPayload, ClientUsers};
use crate::domain::{Client, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_client_id;

/// Query string for `GET /api/v1/clients`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ClientFilter {
    /// Case-insensitive exact name match.
    pub name: Option<String>,
}

/// List organisations visible to the caller.
#[utoipa::path(
    get,
    path = "/api/v1/clients",
    params(ClientFilter),
    responses(
        (status = 200, description = "Clients", body = [Client]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["clients"],
    operation_id = "listClients"
)]
#[get("/clients")]
pub async fn list_clients(
    state: web::Data<HttpState>,
    session: SessionContext,
    filter: web::Query<ClientFilter>,
) -> ApiResult<web::Json<Vec<Client>>> {
    let caller = session.require_caller()?;
    state
        .clients
        .list_clients(&caller, filter.into_inner().name)
        .await
        .map(web::Json)
}

/// Create an organisation.
#[utoipa::path(
    post,
    path = "/api/v1/clients",
    request_body = ClientPayload,
    responses(
        (status = 201, description = "Created", body = Client),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 409, description = "Name taken", body = Error)
    ),
    tags = ["clients"],
    operation_id = "createClient"
)]
#[post("/clients")]
pub async fn create_client(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<ClientPayload>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_caller()?;
    let client = state
        .clients_command
        .create_client(&caller, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(client))
}

/// Fetch one organisation.
#[utoipa::path(
    get,
    path = "/api/v1/clients/{id}",
    params(("id" = String, Path, description = "Client identifier")),
    responses(
        (status = 200, description = "Client", body = Client),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["clients"],
    operation_id = "getClient"
)]
#[get("/clients/{id}")]
pub async fn get_client(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<Client>> {
    let caller = session.require_caller()?;
    let id = parse_client_id(&path)?;
    state.clients.get_client(&caller, id).await.map(web::Json)
}

/// Rename an organisation or change its logo.
#[utoipa::path(
    put,
    path = "/api/v1/clients/{id}",
    params(("id" = String, Path, description = "Client identifier")),
    request_body = ClientPayload,
    responses(
        (status = 200, description = "Updated", body = Client),
        (status = 400, description = "Invalid request", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Name taken", body = Error)
    ),
    tags = ["clients"],
    operation_id = "updateClient"
)]
#[put("/clients/{id}")]
pub async fn update_client(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ClientPayload>,
) -> ApiResult<web::Json<Client>> {
    let caller = session.require_caller()?;
    let id = parse_client_id(&path)?;
    state
        .clients_command
        .update_client(&caller, id, payload.into_inner())
        .await
        .map(web::Json)
}

/// Delete an organisation.
#[utoipa::path(
    delete,
    path = "/api/v1/clients/{id}",
    params(("id" = String, Path, description = "Client identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["clients"],
    operation_id = "deleteClient"
)]
#[delete("/clients/{id}")]
pub async fn delete_client(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_caller()?;
    let id = parse_client_id(&path)?;
    state.clients_command.delete_client(&caller, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Members of an organisation alongside the users the caller may assign.
#[utoipa::path(
    get,
    path = "/api/v1/clients/{id}/users",
    params(("id" = String, Path, description = "Client identifier")),
    responses(
        (status = 200, description = "Client users", body = ClientUsers),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["clients"],
    operation_id = "clientUsers"
)]
#[get("/clients/{id}/users")]
pub async fn client_users(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ClientUsers>> {
    let caller = session.require_caller()?;
    let id = parse_client_id(&path)?;
    state.clients.users_for_client(&caller, id).await.map(web::Json)
}

//! User administration handlers.
//!
//! ```text
//! GET /api/v1/users
//! GET /api/v1/users/{id}
//! PUT /api/v1/users/{id} {"firstName":"Ada","role":"admin"}
//! PATCH /api/v1/users/{id}/status {"active":false}
//! DELETE /api/v1/users/{id}
//! ```

use actix_web::{HttpResponse, delete, get, patch, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::{Error, User, UserUpdate};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_user_id;

/// Request body for `PATCH /api/v1/users/{id}/status`.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct StatusRequest {
    pub active: bool,
}

/// List the users visible to the caller.
///
/// Platform-wide callers see every account; everyone else sees their own
/// organisation only.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses(
        (status = 200, description = "Users", body = [User]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users")]
pub async fn list_users(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<User>>> {
    let caller = session.require_caller()?;
    state.users.list_users(&caller).await.map(web::Json)
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let caller = session.require_caller()?;
    let id = parse_user_id(&path)?;
    state.users.get_user(&caller, &id).await.map(web::Json)
}

/// Update profile fields, password or role.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    request_body = UserUpdate,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error),
        (status = 409, description = "Email taken", body = Error)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UserUpdate>,
) -> ApiResult<web::Json<User>> {
    let caller = session.require_caller()?;
    let id = parse_user_id(&path)?;
    state
        .users_command
        .update_user(&caller, &id, payload.into_inner())
        .await
        .map(web::Json)
}

/// Activate or block a user.
#[utoipa::path(
    patch,
    path = "/api/v1/users/{id}/status",
    params(("id" = String, Path, description = "User identifier")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Updated user", body = User),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "setUserStatus"
)]
#[patch("/users/{id}/status")]
pub async fn set_user_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<StatusRequest>,
) -> ApiResult<web::Json<User>> {
    let caller = session.require_caller()?;
    let id = parse_user_id(&path)?;
    state
        .users_command
        .set_user_status(&caller, &id, payload.active)
        .await
        .map(web::Json)
}

/// Delete a user.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_caller()?;
    let id = parse_user_id(&path)?;
    state.users_command.delete_user(&caller, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

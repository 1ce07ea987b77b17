//! Form definition handlers.
//!
//! ```text
//! POST /api/v1/forms {"title":"Site audit","fields":[{"id":"f1","type":"text","label":"Name"}]}
//! GET /api/v1/forms
//! GET /api/v1/forms/{id}
//! PUT /api/v1/forms/{id}
//! DELETE /api/v1/forms/{id}
//! POST /api/v1/forms/{id}/render {"values":{"f1":"Alice"},"mode":"readOnly"}
//! ```
//!
//! Fetching and rendering a single form is open to anonymous callers so fill
//! links can be shared; everything else needs a session.

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::Error;
use crate::domain::forms::{Form, FormPayload, FormWithOwner, RenderedForm};
use crate::domain::ports::RenderRequest;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_form_id;

/// Store a new form owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/forms",
    request_body = FormPayload,
    responses(
        (status = 201, description = "Form saved", body = Form),
        (status = 400, description = "Invalid definition", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["forms"],
    operation_id = "saveForm"
)]
#[post("/forms")]
pub async fn save_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<FormPayload>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_caller()?;
    let form = state
        .forms_command
        .save_form(&caller, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(form))
}

/// The caller's forms, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/forms",
    responses(
        (status = 200, description = "Forms", body = [Form]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["forms"],
    operation_id = "listForms"
)]
#[get("/forms")]
pub async fn list_forms(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Form>>> {
    let caller = session.require_caller()?;
    state.forms.list_forms(&caller).await.map(web::Json)
}

/// One form with its owner's branding.
#[utoipa::path(
    get,
    path = "/api/v1/forms/{id}",
    params(("id" = String, Path, description = "Form identifier")),
    responses(
        (status = 200, description = "Form", body = FormWithOwner),
        (status = 400, description = "Invalid request", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["forms"],
    operation_id = "getForm",
    security([])
)]
#[get("/forms/{id}")]
pub async fn get_form(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<FormWithOwner>> {
    let id = parse_form_id(&path)?;
    state.forms.get_form(id).await.map(web::Json)
}

/// Replace a form's title, presentation and fields.
#[utoipa::path(
    put,
    path = "/api/v1/forms/{id}",
    params(("id" = String, Path, description = "Form identifier")),
    request_body = FormPayload,
    responses(
        (status = 200, description = "Form replaced", body = Form),
        (status = 400, description = "Invalid definition", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["forms"],
    operation_id = "updateForm"
)]
#[put("/forms/{id}")]
pub async fn update_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<FormPayload>,
) -> ApiResult<web::Json<Form>> {
    let caller = session.require_caller()?;
    let id = parse_form_id(&path)?;
    state
        .forms_command
        .update_form(&caller, id, payload.into_inner())
        .await
        .map(web::Json)
}

/// Delete a form; its responses are kept.
#[utoipa::path(
    delete,
    path = "/api/v1/forms/{id}",
    params(("id" = String, Path, description = "Form identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["forms"],
    operation_id = "deleteForm"
)]
#[delete("/forms/{id}")]
pub async fn delete_form(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_caller()?;
    let id = parse_form_id(&path)?;
    state.forms_command.delete_form(&caller, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Presentation model of a form filled with `values`.
#[utoipa::path(
    post,
    path = "/api/v1/forms/{id}/render",
    params(("id" = String, Path, description = "Form identifier")),
    request_body = RenderRequest,
    responses(
        (status = 200, description = "Rendered form", body = RenderedForm),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["forms"],
    operation_id = "renderForm",
    security([])
)]
#[post("/forms/{id}/render")]
pub async fn render_form(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<RenderRequest>,
) -> ApiResult<web::Json<RenderedForm>> {
    let id = parse_form_id(&path)?;
    state
        .forms
        .render_form(id, payload.into_inner())
        .await
        .map(web::Json)
}

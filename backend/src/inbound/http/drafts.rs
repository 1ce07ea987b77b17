//! Builder draft handlers.
//!
//! Each signed-in user owns at most one draft.
//!
//! ```text
//! GET /api/v1/forms/draft
//! PUT /api/v1/forms/draft {"title":"Audit","fields":[]}
//! POST /api/v1/forms/draft/commands [{"kind":"add_field","type":"radio"}]
//! POST /api/v1/forms/draft/save
//! DELETE /api/v1/forms/draft
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};

use crate::domain::Error;
use crate::domain::forms::{DraftCommand, Form, FormDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// The caller's draft; an empty draft when none is stored.
#[utoipa::path(
    get,
    path = "/api/v1/forms/draft",
    responses(
        (status = 200, description = "Draft", body = FormDraft),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["drafts"],
    operation_id = "loadDraft"
)]
#[get("/forms/draft")]
pub async fn load_draft(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<FormDraft>> {
    let caller = session.require_caller()?;
    state.drafts.load_draft(&caller).await.map(web::Json)
}

/// Replace the caller's draft wholesale.
#[utoipa::path(
    put,
    path = "/api/v1/forms/draft",
    request_body = FormDraft,
    responses(
        (status = 200, description = "Stored draft", body = FormDraft),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["drafts"],
    operation_id = "replaceDraft"
)]
#[put("/forms/draft")]
pub async fn replace_draft(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<FormDraft>,
) -> ApiResult<web::Json<FormDraft>> {
    let caller = session.require_caller()?;
    state
        .drafts
        .replace_draft(&caller, payload.into_inner())
        .await
        .map(web::Json)
}

/// Apply edit commands in order; nothing is stored if any command fails.
#[utoipa::path(
    post,
    path = "/api/v1/forms/draft/commands",
    request_body = [DraftCommand],
    responses(
        (status = 200, description = "Edited draft", body = FormDraft),
        (status = 400, description = "Invalid command", body = Error),
        (status = 404, description = "Unknown field or option", body = Error),
        (status = 409, description = "Duplicate option value", body = Error)
    ),
    tags = ["drafts"],
    operation_id = "applyDraftCommands"
)]
#[post("/forms/draft/commands")]
pub async fn apply_commands(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<Vec<DraftCommand>>,
) -> ApiResult<web::Json<FormDraft>> {
    let caller = session.require_caller()?;
    state
        .drafts
        .apply_commands(&caller, payload.into_inner())
        .await
        .map(web::Json)
}

/// Publish the draft as a form and clear it.
#[utoipa::path(
    post,
    path = "/api/v1/forms/draft/save",
    responses(
        (status = 201, description = "Form saved", body = Form),
        (status = 400, description = "Draft is not a valid form", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["drafts"],
    operation_id = "saveDraft"
)]
#[post("/forms/draft/save")]
pub async fn save_draft(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let caller = session.require_caller()?;
    let form = state.drafts.save_draft(&caller).await?;
    Ok(HttpResponse::Created().json(form))
}

/// Discard the caller's draft.
#[utoipa::path(
    delete,
    path = "/api/v1/forms/draft",
    responses(
        (status = 204, description = "Draft cleared"),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["drafts"],
    operation_id = "clearDraft"
)]
#[delete("/forms/draft")]
pub async fn clear_draft(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let caller = session.require_caller()?;
    state.drafts.clear_draft(&caller).await?;
    Ok(HttpResponse::NoContent().finish())
}

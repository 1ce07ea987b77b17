//! Form response handlers.
//!
//! ```text
//! POST /api/v1/forms/{id}/responses {"answers":{"f1":"Alice"},"category":"incident"}
//! GET /api/v1/forms/responses?category=incident
//! GET /api/v1/forms/responses/{id}
//! PUT /api/v1/forms/responses/{id} {"answers":{"f1":"Bob"}}
//! DELETE /api/v1/forms/responses/{id}
//! GET /api/v1/forms/responses/{id}/report
//! POST /api/v1/forms/responses/{id}/email {"recipient":"safety@example.com"}
//! ```

use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::Error;
use crate::domain::forms::{
    Answers, EmailFailureKind, EmailOutcome, FormResponse, ResponseSummary, ResponseView,
};
use crate::domain::ports::SubmitResponse;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{parse_form_id, parse_response_id};

/// Query string for `GET /api/v1/forms/responses`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ResponseFilter {
    /// Only responses filed under this category.
    pub category: Option<String>,
}

/// Request body for `PUT /api/v1/forms/responses/{id}`.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct ReplaceAnswers {
    /// Replacement answers; keys missing here are dropped.
    #[serde(default)]
    #[schema(value_type = Object)]
    pub answers: Answers,
}

/// Request body for `POST /api/v1/forms/responses/{id}/email`.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct EmailRequest {
    /// Destination address.
    #[serde(default, alias = "to", alias = "email")]
    pub recipient: Option<String>,
}

/// Result of `POST /api/v1/forms/responses/{id}/email`.
#[derive(Debug, PartialEq, Eq, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmailResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
}

fn email_status(outcome: &EmailOutcome) -> StatusCode {
    match outcome {
        EmailOutcome::Sent { .. } => StatusCode::OK,
        EmailOutcome::Failed { kind, .. } => match kind {
            EmailFailureKind::MissingRecipient => StatusCode::BAD_REQUEST,
            EmailFailureKind::Forbidden => StatusCode::FORBIDDEN,
            EmailFailureKind::ResponseNotFound | EmailFailureKind::FormNotFound => {
                StatusCode::NOT_FOUND
            }
            EmailFailureKind::Upstream => StatusCode::BAD_GATEWAY,
            EmailFailureKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        },
    }
}

impl From<&EmailOutcome> for EmailResult {
    fn from(outcome: &EmailOutcome) -> Self {
        let message_id = match outcome {
            EmailOutcome::Sent { message_id } => Some(message_id.clone()),
            EmailOutcome::Failed { .. } => None,
        };
        Self {
            success: outcome.is_success(),
            message: outcome.message().to_owned(),
            message_id,
        }
    }
}

/// Record a response against a form.
#[utoipa::path(
    post,
    path = "/api/v1/forms/{id}/responses",
    params(("id" = String, Path, description = "Form identifier")),
    request_body = SubmitResponse,
    responses(
        (status = 201, description = "Response stored", body = FormResponse),
        (status = 400, description = "Invalid answers", body = Error),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 404, description = "Form not found", body = Error)
    ),
    tags = ["responses"],
    operation_id = "submitResponse"
)]
#[post("/forms/{id}/responses")]
pub async fn submit_response(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<SubmitResponse>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_caller()?;
    let form_id = parse_form_id(&path)?;
    let response = state
        .responses_command
        .submit_response(&caller, form_id, payload.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(response))
}

/// Responses visible to the caller, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/forms/responses",
    params(ResponseFilter),
    responses(
        (status = 200, description = "Responses", body = [ResponseSummary]),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 503, description = "Store unavailable", body = Error)
    ),
    tags = ["responses"],
    operation_id = "listResponses"
)]
#[get("/forms/responses")]
pub async fn list_responses(
    state: web::Data<HttpState>,
    session: SessionContext,
    filter: web::Query<ResponseFilter>,
) -> ApiResult<web::Json<Vec<ResponseSummary>>> {
    let caller = session.require_caller()?;
    state
        .responses
        .list_responses(&caller, filter.into_inner().category)
        .await
        .map(web::Json)
}

/// One response with the current form definition, if it still exists.
#[utoipa::path(
    get,
    path = "/api/v1/forms/responses/{id}",
    params(("id" = String, Path, description = "Response identifier")),
    responses(
        (status = 200, description = "Response", body = ResponseView),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["responses"],
    operation_id = "getResponse"
)]
#[get("/forms/responses/{id}")]
pub async fn get_response(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ResponseView>> {
    let caller = session.require_caller()?;
    let id = parse_response_id(&path)?;
    state.responses.get_response(&caller, id).await.map(web::Json)
}

/// Replace a response's answers in full.
#[utoipa::path(
    put,
    path = "/api/v1/forms/responses/{id}",
    params(("id" = String, Path, description = "Response identifier")),
    request_body = ReplaceAnswers,
    responses(
        (status = 200, description = "Response replaced", body = FormResponse),
        (status = 400, description = "Invalid answers", body = Error),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["responses"],
    operation_id = "updateResponse"
)]
#[put("/forms/responses/{id}")]
pub async fn update_response(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ReplaceAnswers>,
) -> ApiResult<web::Json<FormResponse>> {
    let caller = session.require_caller()?;
    let id = parse_response_id(&path)?;
    state
        .responses_command
        .update_response(&caller, id, payload.into_inner().answers)
        .await
        .map(web::Json)
}

/// Delete a response.
#[utoipa::path(
    delete,
    path = "/api/v1/forms/responses/{id}",
    params(("id" = String, Path, description = "Response identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["responses"],
    operation_id = "deleteResponse"
)]
#[delete("/forms/responses/{id}")]
pub async fn delete_response(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_caller()?;
    let id = parse_response_id(&path)?;
    state.responses_command.delete_response(&caller, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Standalone HTML report of a response, ready for PDF capture.
#[utoipa::path(
    get,
    path = "/api/v1/forms/responses/{id}/report",
    params(("id" = String, Path, description = "Response identifier")),
    responses(
        (status = 200, description = "HTML report", content_type = "text/html", body = String),
        (status = 403, description = "Forbidden", body = Error),
        (status = 404, description = "Response or form not found", body = Error)
    ),
    tags = ["responses"],
    operation_id = "responseReport"
)]
#[get("/forms/responses/{id}/report")]
pub async fn response_report(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_caller()?;
    let id = parse_response_id(&path)?;
    let html = state.responses.response_report(&caller, id).await?;
    Ok(HttpResponse::Ok().content_type(ContentType::html()).body(html))
}

/// Email a response; failures are reported in the body, never as errors.
#[utoipa::path(
    post,
    path = "/api/v1/forms/responses/{id}/email",
    params(("id" = String, Path, description = "Response identifier")),
    request_body = EmailRequest,
    responses(
        (status = 200, description = "Email sent", body = EmailResult),
        (status = 400, description = "Recipient missing", body = EmailResult),
        (status = 401, description = "Unauthorised", body = Error),
        (status = 403, description = "Forbidden", body = EmailResult),
        (status = 404, description = "Response or form not found", body = EmailResult),
        (status = 502, description = "Mail transport rejected the message", body = EmailResult),
        (status = 503, description = "Mail transport unavailable", body = EmailResult)
    ),
    tags = ["responses"],
    operation_id = "emailResponse"
)]
#[post("/forms/responses/{id}/email")]
pub async fn email_response(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<EmailRequest>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_caller()?;
    let id = parse_response_id(&path)?;
    let outcome = state
        .responses_command
        .email_response(&caller, id, payload.into_inner().recipient)
        .await;
    Ok(HttpResponse::build(email_status(&outcome)).json(EmailResult::from(&outcome)))
}

#[cfg(test)]
mod tests;

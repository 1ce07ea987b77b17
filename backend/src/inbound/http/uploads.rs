//! Upload handlers.
//!
//! ```text
//! POST /api/v1/uploads  (raw body, X-Filename: logo.png)
//! GET /uploads/1718000000000-ab12cd.png
//! ```

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::Serialize;

use crate::domain::Error;
use crate::domain::ports::FileStoreError;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::missing_field_error;

/// Header carrying the client-side file name.
pub const FILENAME_HEADER: &str = "X-Filename";

/// Where a stored upload can be fetched.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UploadedFile {
    /// Generated file name.
    #[schema(example = "1718000000000-ab12cd.png")]
    pub name: String,
    /// Public path, suitable for a client logo or a file answer.
    #[schema(example = "/uploads/1718000000000-ab12cd.png")]
    pub path: String,
}

fn map_file_store_error(error: FileStoreError) -> Error {
    match error {
        FileStoreError::InvalidName { name } => {
            Error::invalid_request(format!("invalid upload name: {name}"))
        }
        FileStoreError::NotFound { .. } => Error::not_found("Upload not found"),
        FileStoreError::Io { message } => Error::internal(format!("upload store failure: {message}")),
    }
}

fn content_type_for(name: &str) -> &'static str {
    let extension = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// Store the request body as a new upload.
#[utoipa::path(
    post,
    path = "/api/v1/uploads",
    params(("X-Filename" = String, Header, description = "Original file name")),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 201, description = "Stored", body = UploadedFile),
        (status = 400, description = "Missing file name or empty body", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["uploads"],
    operation_id = "upload"
)]
#[post("/uploads")]
pub async fn upload(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    session.require_caller()?;
    let original_name = request
        .headers()
        .get(FILENAME_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| missing_field_error("filename"))?;
    if body.is_empty() {
        return Err(Error::invalid_request("upload body is empty"));
    }
    let stored = state
        .uploads
        .store(original_name, &body)
        .await
        .map_err(map_file_store_error)?;
    Ok(HttpResponse::Created().json(UploadedFile {
        name: stored.name,
        path: stored.public_path,
    }))
}

/// Serve a stored upload.
#[utoipa::path(
    get,
    path = "/uploads/{name}",
    params(("name" = String, Path, description = "Generated file name")),
    responses(
        (status = 200, description = "File contents", content_type = "application/octet-stream", body = Vec<u8>),
        (status = 400, description = "Invalid name", body = Error),
        (status = 404, description = "Not found", body = Error)
    ),
    tags = ["uploads"],
    operation_id = "serveUpload",
    security([])
)]
#[get("/uploads/{name}")]
pub async fn serve_upload(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let name = path.into_inner();
    let bytes = state.uploads.open(&name).await.map_err(map_file_store_error)?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, content_type_for(&name)))
        .insert_header((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .body(bytes))
}

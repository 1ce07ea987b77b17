//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer
//! - **Schemas**: the domain and request/response types those endpoints use
//! - **Security**: session cookie authentication scheme
//!
//! The generated specification is served by Swagger UI in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::forms::{
    DraftCommand, EmailFailureKind, FieldDto, FieldOption, FieldType, Form, FormDraft,
    FormPayload, FormResponse, FormWithOwner, RenderMode, RenderedField, RenderedForm,
    ResponseSummary, ResponseView, TitleAlignment,
};
use crate::domain::ports::{ClientPayload, ClientUsers, RenderRequest, SubmitResponse};
use crate::domain::{Caller, Client, Error, ErrorCode, Role, User, UserUpdate};
use crate::inbound::http::auth::{LoginRequest, SignupRequest};
use crate::inbound::http::responses::{EmailRequest, EmailResult, ReplaceAnswers};
use crate::inbound::http::uploads::UploadedFile;
use crate::inbound::http::users::StatusRequest;

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login or /api/v1/signup.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Safety reporting backend API",
        description = "Tenants, users, dynamic forms and their responses, behind a session cookie."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::signup,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::me,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::set_user_status,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::clients::list_clients,
        crate::inbound::http::clients::create_client,
        crate::inbound::http::clients::get_client,
        crate::inbound::http::clients::update_client,
        crate::inbound::http::clients::delete_client,
        crate::inbound::http::clients::client_users,
        crate::inbound::http::forms::save_form,
        crate::inbound::http::forms::list_forms,
        crate::inbound::http::forms::get_form,
        crate::inbound::http::forms::update_form,
        crate::inbound::http::forms::delete_form,
        crate::inbound::http::forms::render_form,
        crate::inbound::http::drafts::load_draft,
        crate::inbound::http::drafts::replace_draft,
        crate::inbound::http::drafts::apply_commands,
        crate::inbound::http::drafts::save_draft,
        crate::inbound::http::drafts::clear_draft,
        crate::inbound::http::responses::submit_response,
        crate::inbound::http::responses::list_responses,
        crate::inbound::http::responses::get_response,
        crate::inbound::http::responses::update_response,
        crate::inbound::http::responses::delete_response,
        crate::inbound::http::responses::response_report,
        crate::inbound::http::responses::email_response,
        crate::inbound::http::uploads::upload,
        crate::inbound::http::uploads::serve_upload,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Caller,
        Role,
        User,
        UserUpdate,
        Client,
        ClientPayload,
        ClientUsers,
        SignupRequest,
        LoginRequest,
        StatusRequest,
        FieldType,
        FieldOption,
        FieldDto,
        TitleAlignment,
        FormPayload,
        Form,
        FormWithOwner,
        FormDraft,
        DraftCommand,
        RenderMode,
        RenderRequest,
        RenderedField,
        RenderedForm,
        SubmitResponse,
        ReplaceAnswers,
        FormResponse,
        ResponseSummary,
        ResponseView,
        EmailRequest,
        EmailResult,
        EmailFailureKind,
        UploadedFile,
    )),
    tags(
        (name = "auth", description = "Sign-up, login and the current session"),
        (name = "users", description = "User administration within a tenant"),
        (name = "clients", description = "Tenant organisations"),
        (name = "forms", description = "Form definitions and rendering"),
        (name = "drafts", description = "Per-user form builder drafts"),
        (name = "responses", description = "Submitted responses, reports and email"),
        (name = "uploads", description = "Logo and attachment storage"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

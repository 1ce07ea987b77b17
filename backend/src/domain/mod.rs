//! Domain primitives, aggregates, ports and services.
//!
//! Purpose: define strongly typed entities used by the API and persistence
//! layers, the ports through which adapters are driven, and the services
//! implementing the driving ports. Nothing here knows about HTTP or SQL.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - TraceId: per-request correlation identifier.
//! - accounts: users, clients, roles, credentials and the access policy.
//! - forms: fields, answers, form definitions, drafts, rendering, responses.

pub mod accounts;
pub mod error;
pub mod forms;
pub mod ids;
pub mod ports;
pub mod services;
pub mod slug;
pub mod trace_id;

pub use self::accounts::{
    AccessPolicy, Caller, Client, ClientBranding, ClientId, ClientName, ClientValidationError,
    DEFAULT_OPERATOR_ORG, LoginCredentials, LoginIdentifier, LoginValidationError, LogoRef,
    Registration, RegistrationError, RegistrationInput, Role, UPLOADS_PREFIX, UnknownRoleError,
    User, UserId, UserUpdate, UserValidationError, validate_email, validate_mobile,
    validate_person_name, validate_username,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use safety_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;

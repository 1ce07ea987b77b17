//! Domain services implementing the driving ports.
//!
//! Services are generic over the driven ports they need and hold them behind
//! `Arc`. Port errors are mapped here: connection failures become
//! `service_unavailable`, query failures `internal_error` and uniqueness
//! violations `conflict`.

mod accounts;
mod clients;
mod drafts;
mod forms;
mod responses;
mod users;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use accounts::AccountService;
pub use clients::ClientsService;
pub use drafts::DraftsService;
pub use forms::FormsService;
pub use responses::ResponsesService;
pub use users::UsersService;

use crate::domain::Error;
use crate::domain::ports::{
    ClientRepositoryError, DraftStoreError, FormRepositoryError, PasswordHashError,
    ResponseRepositoryError, UserRepositoryError,
};

pub(crate) fn map_form_repository_error(error: FormRepositoryError) -> Error {
    match error {
        FormRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("form repository unavailable: {message}"))
        }
        FormRepositoryError::Query { message } => {
            Error::internal(format!("form repository error: {message}"))
        }
    }
}

pub(crate) fn map_response_repository_error(error: ResponseRepositoryError) -> Error {
    match error {
        ResponseRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("response repository unavailable: {message}"))
        }
        ResponseRepositoryError::Query { message } => {
            Error::internal(format!("response repository error: {message}"))
        }
    }
}

pub(crate) fn map_draft_store_error(error: DraftStoreError) -> Error {
    match error {
        DraftStoreError::Connection { message } => {
            Error::service_unavailable(format!("draft store unavailable: {message}"))
        }
        DraftStoreError::Query { message } => Error::internal(format!("draft store error: {message}")),
    }
}

pub(crate) fn map_user_repository_error(error: UserRepositoryError) -> Error {
    match error {
        UserRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserRepositoryError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserRepositoryError::Conflict { .. } => {
            Error::conflict("User with this email or username already exists")
        }
    }
}

pub(crate) fn map_client_repository_error(error: ClientRepositoryError) -> Error {
    match error {
        ClientRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("client repository unavailable: {message}"))
        }
        ClientRepositoryError::Query { message } => {
            Error::internal(format!("client repository error: {message}"))
        }
        ClientRepositoryError::Conflict { .. } => {
            Error::conflict("Client with this name already exists")
        }
    }
}

pub(crate) fn map_password_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(map_form_repository_error(FormRepositoryError::connection("down")), ErrorCode::ServiceUnavailable)]
    #[case(map_form_repository_error(FormRepositoryError::query("bad")), ErrorCode::InternalError)]
    #[case(map_response_repository_error(ResponseRepositoryError::connection("down")), ErrorCode::ServiceUnavailable)]
    #[case(map_draft_store_error(DraftStoreError::query("bad")), ErrorCode::InternalError)]
    #[case(map_user_repository_error(UserRepositoryError::conflict("email")), ErrorCode::Conflict)]
    #[case(map_client_repository_error(ClientRepositoryError::conflict("name")), ErrorCode::Conflict)]
    #[case(map_password_error(PasswordHashError::hash("cost")), ErrorCode::InternalError)]
    fn port_errors_map_to_stable_codes(#[case] error: Error, #[case] expected: ErrorCode) {
        assert_eq!(error.code(), expected);
    }
}

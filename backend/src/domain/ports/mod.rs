//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`DraftStore`], [`MailTransport`],
//! [`FileStore`], [`PasswordHasher`]) expose strongly typed errors so adapters
//! map their failures into predictable variants. Driving ports (`*Command`,
//! `*Query`, [`LoginService`]) return the transport-agnostic domain error.

mod macros;
pub(crate) use macros::define_port_error;

mod client_repository;
mod clients_command;
mod clients_query;
mod draft_store;
mod drafts_command;
mod file_store;
mod form_repository;
mod forms_command;
mod forms_query;
mod login_service;
mod mail_transport;
mod password_hasher;
mod response_repository;
mod responses_command;
mod responses_query;
mod user_repository;
mod users_command;
mod users_query;

#[cfg(test)]
pub use client_repository::MockClientRepository;
pub use client_repository::{ClientRepository, ClientRepositoryError};
#[cfg(test)]
pub use clients_command::MockClientsCommand;
pub use clients_command::{ClientPayload, ClientsCommand};
#[cfg(test)]
pub use clients_query::MockClientsQuery;
pub use clients_query::{ClientUsers, ClientsQuery};
#[cfg(test)]
pub use draft_store::MockDraftStore;
pub use draft_store::{DraftStore, DraftStoreError};
#[cfg(test)]
pub use drafts_command::MockDraftsCommand;
pub use drafts_command::DraftsCommand;
#[cfg(test)]
pub use file_store::MockFileStore;
pub use file_store::{FileStore, FileStoreError, StoredFile};
#[cfg(test)]
pub use form_repository::MockFormRepository;
pub use form_repository::{FormRepository, FormRepositoryError};
#[cfg(test)]
pub use forms_command::MockFormsCommand;
pub use forms_command::FormsCommand;
#[cfg(test)]
pub use forms_query::MockFormsQuery;
pub use forms_query::{FormsQuery, RenderRequest};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use mail_transport::MockMailTransport;
pub use mail_transport::{MailError, MailTransport, OutgoingMail};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use response_repository::MockResponseRepository;
pub use response_repository::{ResponseFilter, ResponseRepository, ResponseRepositoryError};
#[cfg(test)]
pub use responses_command::MockResponsesCommand;
pub use responses_command::{ResponsesCommand, SubmitResponse};
#[cfg(test)]
pub use responses_query::MockResponsesQuery;
pub use responses_query::ResponsesQuery;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{StoredCredentials, UserRepository, UserRepositoryError};
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::UsersCommand;
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::UsersQuery;

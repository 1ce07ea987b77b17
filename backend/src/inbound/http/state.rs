//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only
//! depend on driving ports and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::AccessPolicy;
use crate::domain::ids::IdGenerator;
use crate::domain::ports::{
    ClientRepository, ClientsCommand, ClientsQuery, DraftStore, DraftsCommand, FileStore,
    FormRepository, FormsCommand, FormsQuery, LoginService, MailTransport, PasswordHasher,
    ResponseRepository, ResponsesCommand, ResponsesQuery, UserRepository, UsersCommand,
    UsersQuery,
};
use crate::domain::services::{
    AccountService, ClientsService, DraftsService, FormsService, ResponsesService, UsersService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UsersQuery>,
    pub users_command: Arc<dyn UsersCommand>,
    pub clients: Arc<dyn ClientsQuery>,
    pub clients_command: Arc<dyn ClientsCommand>,
    pub forms: Arc<dyn FormsQuery>,
    pub forms_command: Arc<dyn FormsCommand>,
    pub drafts: Arc<dyn DraftsCommand>,
    pub responses: Arc<dyn ResponsesQuery>,
    pub responses_command: Arc<dyn ResponsesCommand>,
    pub uploads: Arc<dyn FileStore>,
}

/// Parameter object bundling the driven adapters the services run on.
///
/// The repository types stay generic so the same wiring serves the Diesel
/// and in-memory adapters.
pub struct StateAdapters<U, C, F, R, D, H> {
    pub users: Arc<U>,
    pub clients: Arc<C>,
    pub forms: Arc<F>,
    pub responses: Arc<R>,
    pub drafts: Arc<D>,
    pub hasher: Arc<H>,
    pub files: Arc<dyn FileStore>,
    pub mail: Arc<dyn MailTransport>,
    pub ids: Arc<dyn IdGenerator>,
    pub policy: AccessPolicy,
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Build every domain service over `adapters` and expose them as ports.
    pub fn from_adapters<U, C, F, R, D, H>(adapters: StateAdapters<U, C, F, R, D, H>) -> Self
    where
        U: UserRepository + 'static,
        C: ClientRepository + 'static,
        F: FormRepository + 'static,
        R: ResponseRepository + 'static,
        D: DraftStore + 'static,
        H: PasswordHasher + 'static,
    {
        let StateAdapters {
            users,
            clients,
            forms,
            responses,
            drafts,
            hasher,
            files,
            mail,
            ids,
            policy,
            clock,
        } = adapters;

        let accounts = Arc::new(AccountService::new(
            users.clone(),
            clients.clone(),
            hasher.clone(),
            clock.clone(),
        ));
        let user_service = Arc::new(UsersService::new(users.clone(), hasher, policy.clone()));
        let client_service = Arc::new(ClientsService::new(
            clients.clone(),
            users.clone(),
            files.clone(),
            policy.clone(),
            clock.clone(),
        ));
        let form_service = Arc::new(FormsService::new(
            forms,
            users,
            clients,
            policy.clone(),
            clock.clone(),
        ));
        let draft_service = Arc::new(DraftsService::new(
            drafts,
            form_service.clone(),
            ids,
            clock.clone(),
        ));
        let response_service = Arc::new(ResponsesService::new(
            responses,
            form_service.clone(),
            mail,
            policy,
            clock,
        ));

        Self {
            login: accounts,
            users: user_service.clone(),
            users_command: user_service,
            clients: client_service.clone(),
            clients_command: client_service,
            forms: form_service.clone(),
            forms_command: form_service,
            drafts: draft_service,
            responses: response_service.clone(),
            responses_command: response_service,
            uploads: files,
        }
    }
}

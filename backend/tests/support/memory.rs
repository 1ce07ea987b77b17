//! In-memory application wiring shared by the behaviour suites.

use std::future::Future;
use std::sync::Arc;

use mockable::DefaultClock;
use safety_backend::domain::ids::RandomIdGenerator;
use safety_backend::domain::ports::UserRepository;
use safety_backend::domain::{AccessPolicy, Caller, Registration, RegistrationInput, Role, User};
use safety_backend::inbound::http::state::{HttpState, StateAdapters};
use safety_backend::outbound::mail::LoggingMailTransport;
use safety_backend::outbound::memory::{
    MemoryClientRepository, MemoryDraftStore, MemoryFormRepository, MemoryResponseRepository,
    MemoryUserRepository,
};
use safety_backend::outbound::password::BcryptPasswordHasher;
use safety_backend::outbound::uploads::CapFileStore;
use tempfile::TempDir;
use tokio::runtime::{Builder, Runtime};

const PASSWORD: &str = "secret-pass";

/// Services over the in-memory adapters plus a runtime to drive them.
pub struct MemoryApp {
    runtime: Runtime,
    pub state: HttpState,
    users: Arc<MemoryUserRepository>,
    _uploads: TempDir,
}

impl MemoryApp {
    pub fn new() -> Self {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("tokio runtime");
        let uploads = TempDir::new().expect("uploads dir");
        let files =
            CapFileStore::open(uploads.path(), Arc::new(DefaultClock)).expect("file store");
        let users = Arc::new(MemoryUserRepository::new());
        let state = HttpState::from_adapters(StateAdapters {
            users: users.clone(),
            clients: Arc::new(MemoryClientRepository::new()),
            forms: Arc::new(MemoryFormRepository::new()),
            responses: Arc::new(MemoryResponseRepository::new()),
            drafts: Arc::new(MemoryDraftStore::new()),
            hasher: Arc::new(BcryptPasswordHasher::new(4)),
            files: Arc::new(files),
            mail: Arc::new(LoggingMailTransport),
            ids: Arc::new(RandomIdGenerator),
            policy: AccessPolicy::default(),
            clock: Arc::new(DefaultClock),
        });
        Self {
            runtime,
            state,
            users,
            _uploads: uploads,
        }
    }

    /// Drive `future` to completion on the suite's runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Register `username` in `company` and return their session identity.
    pub fn sign_up(&self, username: &str, company: &str) -> Caller {
        let email = format!("{username}@example.com");
        let input = RegistrationInput {
            username,
            first_name: "Test",
            last_name: username,
            email: &email,
            job_title: None,
            companyname: Some(company),
            mobile: None,
            password: PASSWORD,
            password_confirm: PASSWORD,
        };
        let registration = Registration::validate(&input).expect("valid registration");
        let user = self
            .block_on(self.state.login.register(registration))
            .expect("registered");
        Caller::from(&user)
    }

    /// Change a stored user's role and return the refreshed identity.
    pub fn promote(&self, caller: &Caller, role: Role) -> Caller {
        let mut user: User = self
            .block_on(self.users.find_by_id(&caller.user_id))
            .expect("lookup user")
            .expect("registered user");
        user.role = role;
        self.block_on(self.users.update(&user)).expect("update role");
        Caller::from(&user)
    }
}

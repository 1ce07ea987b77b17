//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test, web};
use mockable::DefaultClock;
use serde_json::{Value, json};
use tempfile::TempDir;

use crate::domain::ids::RandomIdGenerator;
use crate::domain::ports::UserRepository;
use crate::domain::{AccessPolicy, Role};
use crate::inbound::http::error::json_config;
use crate::inbound::http::state::{HttpState, StateAdapters};
use crate::inbound::http::{configure, uploads};
use crate::outbound::mail::LoggingMailTransport;
use crate::outbound::memory::{
    MemoryClientRepository, MemoryDraftStore, MemoryFormRepository, MemoryResponseRepository,
    MemoryUserRepository,
};
use crate::outbound::password::BcryptPasswordHasher;
use crate::outbound::uploads::CapFileStore;

/// Password used by every account the helpers register.
pub const TEST_PASSWORD: &str = "secret-pass";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Memory-backed application state with handles on the stores tests seed.
pub struct TestHarness {
    pub state: HttpState,
    pub users: Arc<MemoryUserRepository>,
    _uploads: TempDir,
}

impl TestHarness {
    pub fn new() -> Self {
        let uploads = TempDir::new().expect("uploads dir");
        let files = CapFileStore::open(uploads.path(), Arc::new(DefaultClock)).expect("file store");
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
            state,
            users,
            _uploads: uploads,
        }
    }

    /// Application over this harness's state.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        test_app(self.state.clone())
    }

    /// Change a stored user's role; callers must sign in again to pick it up.
    pub async fn set_role(&self, username: &str, role: Role) {
        let mut user = self
            .users
            .list()
            .await
            .expect("list users")
            .into_iter()
            .find(|user| user.username == username)
            .expect("registered user");
        user.role = role;
        self.users.update(&user).await.expect("update role");
    }
}

/// Application wired like the server, minus tracing and docs.
pub fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .app_data(json_config())
        .wrap(test_session_middleware())
        .service(web::scope("/api/v1").configure(configure))
        .service(uploads::serve_upload)
}

fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie")
}

/// Register `username` in `company` and return the created user and cookie.
pub async fn sign_up<S, B>(app: &S, username: &str, company: &str) -> (Value, Cookie<'static>)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let request = test::TestRequest::post()
        .uri("/api/v1/signup")
        .set_json(json!({
            "username": username,
            "firstName": "Test",
            "lastName": username,
            "email": format!("{username}@example.com"),
            "companyname": company,
            "password": TEST_PASSWORD,
            "passwordConfirm": TEST_PASSWORD,
        }))
        .to_request();
    let response = test::call_service(app, request).await;
    assert_eq!(response.status(), actix_web::http::StatusCode::CREATED);
    let cookie = session_cookie(&response);
    let body: Value = test::read_body_json(response).await;
    (body, cookie)
}

/// Sign `login` in with [`TEST_PASSWORD`] and return the session cookie.
pub async fn log_in<S, B>(app: &S, login: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let request = test::TestRequest::post()
        .uri("/api/v1/login")
        .set_json(json!({"login": login, "password": TEST_PASSWORD}))
        .to_request();
    let response = test::call_service(app, request).await;
    assert!(response.status().is_success(), "login failed: {}", response.status());
    session_cookie(&response)
}

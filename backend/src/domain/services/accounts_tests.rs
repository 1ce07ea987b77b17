//! Tests for sign-in and sign-up.

use std::sync::Arc;

use rstest::rstest;

use super::*;
use crate::domain::ports::{
    MockClientRepository, MockPasswordHasher, MockUserRepository, PasswordHashError,
    StoredCredentials, UserRepositoryError,
};
use crate::domain::services::test_helpers::{fixture_clock, fixture_timestamp, user};
use crate::domain::{ErrorCode, RegistrationInput};
use crate::outbound::memory::{MemoryClientRepository, MemoryUserRepository};
use crate::outbound::password::BcryptPasswordHasher;

type Service = AccountService<MockUserRepository, MockClientRepository, MockPasswordHasher>;

fn service(
    users: MockUserRepository,
    clients: MockClientRepository,
    hasher: MockPasswordHasher,
) -> Service {
    AccountService::new(
        Arc::new(users),
        Arc::new(clients),
        Arc::new(hasher),
        fixture_clock(),
    )
}

fn credentials() -> LoginCredentials {
    LoginCredentials::try_from_parts("ada@example.com", "secret").expect("valid credentials")
}

fn registration(company: &str) -> Registration {
    Registration::validate(&RegistrationInput {
        username: "ada",
        first_name: "Ada",
        last_name: "Lovelace",
        email: "Ada@Example.com",
        companyname: Some(company),
        password: "secret1",
        password_confirm: "secret1",
        ..RegistrationInput::default()
    })
    .expect("valid registration")
}

fn existing_client(name: &str) -> Client {
    Client {
        id: ClientId::random(),
        name: ClientName::new(name).expect("valid name"),
        logo: None,
        created_at: fixture_timestamp(),
    }
}

fn users_with(active: bool) -> MockUserRepository {
    let mut account = user("Acme", Role::User, None);
    account.active = active;
    let mut users = MockUserRepository::new();
    users.expect_find_credentials().return_once(move |_| {
        Ok(Some(StoredCredentials {
            user: account,
            password_hash: "hash".into(),
        }))
    });
    users
}

fn hasher_verifying(result: bool) -> MockPasswordHasher {
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().return_once(move |_, _| Ok(result));
    hasher
}

#[tokio::test]
async fn authenticate_returns_the_active_user() {
    let signed_in = service(users_with(true), MockClientRepository::new(), hasher_verifying(true))
        .authenticate(&credentials())
        .await
        .expect("signed in");

    assert_eq!(signed_in.email, "ada@example.com");
}

#[rstest]
#[case(true, false, ErrorCode::Unauthorized)]
#[case(false, true, ErrorCode::Forbidden)]
#[tokio::test]
async fn authenticate_rejects_bad_passwords_and_blocked_users(
    #[case] active: bool,
    #[case] password_ok: bool,
    #[case] expected: ErrorCode,
) {
    let error = service(
        users_with(active),
        MockClientRepository::new(),
        hasher_verifying(password_ok),
    )
    .authenticate(&credentials())
    .await
    .expect_err("rejected");

    assert_eq!(error.code(), expected);
}

#[tokio::test]
async fn authenticate_unknown_login_is_unauthorised() {
    let mut users = MockUserRepository::new();
    users.expect_find_credentials().return_once(|_| Ok(None));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_verify().times(0);

    let error = service(users, MockClientRepository::new(), hasher)
        .authenticate(&credentials())
        .await
        .expect_err("unknown login");

    assert_eq!(error.code(), ErrorCode::Unauthorized);
    assert_eq!(error.message(), INVALID_CREDENTIALS);
}

#[tokio::test]
async fn authenticate_maps_hashing_failures_to_internal_errors() {
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_verify()
        .return_once(|_, _| Err(PasswordHashError::hash("corrupt hash")));

    let error = service(users_with(true), MockClientRepository::new(), hasher)
        .authenticate(&credentials())
        .await
        .expect_err("hash failure");

    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[tokio::test]
async fn register_joins_an_existing_client_case_insensitively() {
    let acme = existing_client("Acme");
    let acme_id = acme.id;
    let mut clients = MockClientRepository::new();
    clients
        .expect_find_by_name()
        .withf(|name| name == "ACME")
        .return_once(move |_| Ok(Some(acme)));
    clients.expect_create().times(0);
    let mut users = MockUserRepository::new();
    users
        .expect_create()
        .withf(|_, hash| hash == "hashed")
        .times(1)
        .return_once(|_, _| Ok(()));
    let mut hasher = MockPasswordHasher::new();
    hasher
        .expect_hash()
        .withf(|password| password == "secret1")
        .return_once(|_| Ok("hashed".into()));

    let registered = service(users, clients, hasher)
        .register(registration("ACME"))
        .await
        .expect("registered");

    assert_eq!(registered.companyname, "Acme");
    assert_eq!(registered.client_id, Some(acme_id));
    assert_eq!(registered.role, Role::User);
    assert_eq!(registered.email, "ada@example.com");
    assert!(registered.active);
}

#[tokio::test]
async fn register_creates_a_missing_client() {
    let mut clients = MockClientRepository::new();
    clients.expect_find_by_name().return_once(|_| Ok(None));
    clients
        .expect_create()
        .withf(|client| client.name.as_str() == "Globex")
        .times(1)
        .return_once(|_| Ok(()));
    let mut users = MockUserRepository::new();
    users.expect_create().return_once(|_, _| Ok(()));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_hash().return_once(|_| Ok("hashed".into()));

    let registered = service(users, clients, hasher)
        .register(registration("Globex"))
        .await
        .expect("registered");

    assert_eq!(registered.companyname, "Globex");
    assert!(registered.client_id.is_some());
}

#[tokio::test]
async fn register_duplicate_account_is_a_conflict() {
    let mut clients = MockClientRepository::new();
    clients
        .expect_find_by_name()
        .return_once(|_| Ok(Some(existing_client("Acme"))));
    let mut users = MockUserRepository::new();
    users
        .expect_create()
        .return_once(|_, _| Err(UserRepositoryError::conflict("users_email_key")));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_hash().return_once(|_| Ok("hashed".into()));

    let error = service(users, clients, hasher)
        .register(registration("Acme"))
        .await
        .expect_err("duplicate");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn register_conflict_discards_a_client_it_created() {
    let mut clients = MockClientRepository::new();
    clients.expect_find_by_name().return_once(|_| Ok(None));
    clients.expect_create().return_once(|_| Ok(()));
    clients.expect_delete().times(1).return_once(|_| Ok(true));
    let mut users = MockUserRepository::new();
    users
        .expect_create()
        .return_once(|_, _| Err(UserRepositoryError::conflict("users_email_key")));
    let mut hasher = MockPasswordHasher::new();
    hasher.expect_hash().return_once(|_| Ok("hashed".into()));

    let error = service(users, clients, hasher)
        .register(registration("Globex"))
        .await
        .expect_err("duplicate");

    assert_eq!(error.code(), ErrorCode::Conflict);
}

#[tokio::test]
async fn duplicate_signup_under_a_new_company_leaves_no_client_behind() {
    let clients = Arc::new(MemoryClientRepository::new());
    let accounts = AccountService::new(
        Arc::new(MemoryUserRepository::new()),
        clients.clone(),
        Arc::new(BcryptPasswordHasher::new(4)),
        fixture_clock(),
    );
    accounts
        .register(registration("Acme"))
        .await
        .expect("first signup");

    let error = accounts
        .register(registration("Globex"))
        .await
        .expect_err("same email");

    assert_eq!(error.code(), ErrorCode::Conflict);
    let names: Vec<String> = clients
        .list()
        .await
        .expect("clients listed")
        .into_iter()
        .map(|client| client.name.to_string())
        .collect();
    assert_eq!(names, vec!["Acme".to_owned()]);
}

//! Accounts, organisations and tenant scoping.

pub mod access;
pub mod client;
pub mod credentials;
pub mod role;
pub mod user;

pub use access::{AccessPolicy, Caller, DEFAULT_OPERATOR_ORG};
pub use client::{
    Client, ClientBranding, ClientId, ClientName, ClientValidationError, LogoRef, UPLOADS_PREFIX,
};
pub use credentials::{
    LoginCredentials, LoginIdentifier, LoginValidationError, Registration, RegistrationError,
    RegistrationInput,
};
pub use role::{Role, UnknownRoleError};
pub use user::{
    User, UserId, UserUpdate, UserValidationError, validate_email, validate_mobile,
    validate_person_name, validate_username,
};

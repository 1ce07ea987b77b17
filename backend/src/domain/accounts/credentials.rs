//! Login credentials and sign-up registrations.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use super::client::{ClientName, ClientValidationError};
use super::user::{
    UserValidationError, validate_email, validate_mobile, validate_person_name, validate_username,
};

/// Minimum password length accepted at sign-up.
pub const PASSWORD_MIN_LEN: usize = 6;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Login identifier was missing or blank once trimmed.
    EmptyLogin,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyLogin => write!(f, "email or username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// How the caller identified themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginIdentifier {
    /// Lowercased email address.
    Email(String),
    /// Username as typed.
    Username(String),
}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - The identifier is trimmed and non-empty; anything containing `@` is
///   treated as an email and lowercased.
/// - `password` must be non-empty but retains caller-provided whitespace.
///
/// # Examples
/// ```
/// use safety_backend::domain::{LoginCredentials, LoginIdentifier};
///
/// let creds = LoginCredentials::try_from_parts(" Ada@Example.com ", "pw").unwrap();
/// assert_eq!(creds.identifier(), &LoginIdentifier::Email("ada@example.com".into()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    identifier: LoginIdentifier,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from a raw login (email or username) and password.
    pub fn try_from_parts(login: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = login.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyLogin);
        }
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        let identifier = if normalized.contains('@') {
            LoginIdentifier::Email(normalized.to_lowercase())
        } else {
            LoginIdentifier::Username(normalized.to_owned())
        };
        Ok(Self {
            identifier,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Identifier used for the account lookup.
    pub fn identifier(&self) -> &LoginIdentifier {
        &self.identifier
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validation failures for sign-up payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    /// A profile field failed validation.
    #[error(transparent)]
    Profile(#[from] UserValidationError),
    /// The company name was missing or invalid.
    #[error("Company name is required")]
    MissingCompany,
    /// The password was shorter than [`PASSWORD_MIN_LEN`].
    #[error("password must be at least {min} characters")]
    PasswordTooShort {
        /// Minimum accepted length.
        min: usize,
    },
    /// The confirmation did not match the password.
    #[error("passwords do not match")]
    PasswordMismatch,
}

impl RegistrationError {
    /// Payload field the error refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Profile(UserValidationError::InvalidUsername) => "username",
            Self::Profile(UserValidationError::InvalidEmail) => "email",
            Self::Profile(UserValidationError::InvalidMobile) => "mobile",
            Self::Profile(UserValidationError::InvalidName { field, .. }) => field,
            Self::Profile(_) => "id",
            Self::MissingCompany => "companyname",
            Self::PasswordTooShort { .. } => "password",
            Self::PasswordMismatch => "passwordConfirm",
        }
    }
}

/// Raw sign-up input.
#[derive(Debug, Clone, Default)]
pub struct RegistrationInput<'a> {
    /// Desired username.
    pub username: &'a str,
    /// Given name.
    pub first_name: &'a str,
    /// Family name.
    pub last_name: &'a str,
    /// Email address.
    pub email: &'a str,
    /// Optional job title.
    pub job_title: Option<&'a str>,
    /// Organisation name.
    pub companyname: Option<&'a str>,
    /// Optional mobile number.
    pub mobile: Option<&'a str>,
    /// Password.
    pub password: &'a str,
    /// Password confirmation.
    pub password_confirm: &'a str,
}

/// Validated sign-up data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Validated username.
    pub username: String,
    /// Validated given name.
    pub first_name: String,
    /// Validated family name.
    pub last_name: String,
    /// Lowercased email.
    pub email: String,
    /// Trimmed job title.
    pub job_title: Option<String>,
    /// Organisation name as typed (resolved case-insensitively later).
    pub company: ClientName,
    /// Validated mobile number.
    pub mobile: Option<String>,
    /// Plain-text password, wiped on drop.
    pub password: Zeroizing<String>,
}

impl Registration {
    /// Validate a sign-up payload.
    pub fn validate(input: &RegistrationInput<'_>) -> Result<Self, RegistrationError> {
        let username = validate_username(input.username)?;
        let first_name = validate_person_name("firstName", input.first_name)?;
        let last_name = validate_person_name("lastName", input.last_name)?;
        let email = validate_email(input.email)?;
        let mobile = validate_mobile(input.mobile)?;
        let company = input
            .companyname
            .map(ClientName::new)
            .transpose()
            .map_err(|_: ClientValidationError| RegistrationError::MissingCompany)?
            .ok_or(RegistrationError::MissingCompany)?;
        if input.password.chars().count() < PASSWORD_MIN_LEN {
            return Err(RegistrationError::PasswordTooShort {
                min: PASSWORD_MIN_LEN,
            });
        }
        if input.password != input.password_confirm {
            return Err(RegistrationError::PasswordMismatch);
        }
        let job_title = input
            .job_title
            .map(str::trim)
            .filter(|title| !title.is_empty())
            .map(str::to_owned);

        Ok(Self {
            username,
            first_name,
            last_name,
            email,
            job_title,
            company,
            mobile,
            password: Zeroizing::new(input.password.to_owned()),
        })
    }
}

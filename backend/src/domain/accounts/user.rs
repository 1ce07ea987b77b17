//! User identity and account records.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::client::ClientId;
use super::role::Role;

/// Validation errors returned by account value constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The user id was blank.
    #[error("user id must not be empty")]
    EmptyId,
    /// The user id was not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// The username did not match `[A-Za-z0-9]{3,30}`.
    #[error("username must be 3-30 letters or digits")]
    InvalidUsername,
    /// The email address was malformed.
    #[error("email must be a valid address")]
    InvalidEmail,
    /// A person name was empty or longer than allowed.
    #[error("{field} must be between 1 and {max} characters")]
    InvalidName {
        /// Offending field.
        field: &'static str,
        /// Maximum accepted length.
        max: usize,
    },
    /// The mobile number was malformed.
    #[error("mobile must be 7-15 digits with an optional leading '+'")]
    InvalidMobile,
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();
static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
static MOBILE_RE: OnceLock<Regex> = OnceLock::new();

fn compiled(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| match Regex::new(pattern) {
        Ok(re) => re,
        Err(error) => panic!("account regex failed to compile: {error}"),
    })
}

/// Maximum length of first and last names.
pub const PERSON_NAME_MAX: usize = 50;

/// Validate a username (`[A-Za-z0-9]{3,30}`), returning it trimmed.
pub fn validate_username(raw: &str) -> Result<String, UserValidationError> {
    let value = raw.trim();
    if compiled(&USERNAME_RE, r"^[A-Za-z0-9]{3,30}$").is_match(value) {
        Ok(value.to_owned())
    } else {
        Err(UserValidationError::InvalidUsername)
    }
}

/// Validate an email address, returning it trimmed and lowercased.
///
/// # Examples
/// ```
/// use safety_backend::domain::validate_email;
///
/// assert_eq!(validate_email(" Ada@Example.COM ").as_deref(), Ok("ada@example.com"));
/// ```
pub fn validate_email(raw: &str) -> Result<String, UserValidationError> {
    let value = raw.trim().to_lowercase();
    if compiled(&EMAIL_RE, r"^[^\s@]+@[^\s@]+\.[^\s@]+$").is_match(&value) {
        Ok(value)
    } else {
        Err(UserValidationError::InvalidEmail)
    }
}

/// Validate a first or last name.
pub fn validate_person_name(field: &'static str, raw: &str) -> Result<String, UserValidationError> {
    let value = raw.trim();
    let length = value.chars().count();
    if (1..=PERSON_NAME_MAX).contains(&length) {
        Ok(value.to_owned())
    } else {
        Err(UserValidationError::InvalidName {
            field,
            max: PERSON_NAME_MAX,
        })
    }
}

/// Validate an optional mobile number (`^\+?\d{7,15}$`). Blank input is `None`.
pub fn validate_mobile(raw: Option<&str>) -> Result<Option<String>, UserValidationError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) if compiled(&MOBILE_RE, r"^\+?\d{7,15}$").is_match(value) => {
            Ok(Some(value.to_owned()))
        }
        Some(_) => Err(UserValidationError::InvalidMobile),
    }
}

/// Account record as exposed to callers. Password material is never part of it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Stable identifier.
    #[schema(value_type = String, format = Uuid)]
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Unique, lowercased email address.
    pub email: String,
    /// Optional job title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    /// Canonical name of the user's organisation.
    pub companyname: String,
    /// Optional mobile number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    /// Organisation the user belongs to.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = Uuid)]
    pub client_id: Option<ClientId>,
    /// Privilege level.
    pub role: Role,
    /// Inactive users cannot open sessions.
    pub active: bool,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Full display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Field-level changes applied by `updateUser`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    /// New given name.
    pub first_name: Option<String>,
    /// New family name.
    pub last_name: Option<String>,
    /// New email address.
    pub email: Option<String>,
    /// New job title.
    pub job_title: Option<String>,
    /// New mobile number.
    pub mobile: Option<String>,
    /// New password (hashed before storage).
    pub password: Option<String>,
    /// New role; only admins may change it.
    pub role: Option<Role>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ada", true)]
    #[case("Ada1990", true)]
    #[case("ab", false)]
    #[case("with space", false)]
    #[case("under_score", false)]
    fn username_rules(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(validate_username(raw).is_ok(), ok);
    }

    #[rstest]
    #[case("ada@example.com", true)]
    #[case("ADA@EXAMPLE.COM", true)]
    #[case("ada@", false)]
    #[case("ada example@x.io", false)]
    fn email_rules(#[case] raw: &str, #[case] ok: bool) {
        assert_eq!(validate_email(raw).is_ok(), ok);
    }

    #[rstest]
    #[case(None, Ok(None))]
    #[case(Some("  "), Ok(None))]
    #[case(Some("+447700900123"), Ok(Some("+447700900123".to_owned())))]
    #[case(Some("123"), Err(UserValidationError::InvalidMobile))]
    fn mobile_rules(
        #[case] raw: Option<&str>,
        #[case] expected: Result<Option<String>, UserValidationError>,
    ) {
        assert_eq!(validate_mobile(raw), expected);
    }

    #[rstest]
    fn person_names_are_bounded() {
        assert!(validate_person_name("firstName", "Ada").is_ok());
        assert!(validate_person_name("firstName", " ").is_err());
        assert!(validate_person_name("lastName", &"x".repeat(51)).is_err());
    }

    #[rstest]
    fn user_id_rejects_non_uuid() {
        assert_eq!(UserId::new("nope"), Err(UserValidationError::InvalidId));
        assert_eq!(UserId::new(""), Err(UserValidationError::EmptyId));
    }
}

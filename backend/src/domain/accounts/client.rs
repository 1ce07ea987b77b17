//! Client organisations (tenants).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Public path prefix under which uploaded files are served.
pub const UPLOADS_PREFIX: &str = "/uploads/";
/// Maximum client name length.
pub const CLIENT_NAME_MAX: usize = 200;

/// Client identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(Uuid);

impl ClientId {
    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validation errors for client records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientValidationError {
    /// The name was blank.
    #[error("Client name is required")]
    EmptyName,
    /// The name exceeded [`CLIENT_NAME_MAX`] characters.
    #[error("client name must be at most {max} characters")]
    NameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// The logo was neither an http(s) URL nor an uploads path.
    #[error("logo must be an http(s) URL or an uploaded file path")]
    InvalidLogo,
}

/// Trimmed, non-empty organisation name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClientName(String);

impl ClientName {
    /// Validate a client name.
    ///
    /// # Examples
    /// ```
    /// use safety_backend::domain::ClientName;
    ///
    /// let name = ClientName::new("  Acme Rail ").expect("valid name");
    /// assert_eq!(name.as_str(), "Acme Rail");
    /// assert!(ClientName::new("   ").is_err());
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, ClientValidationError> {
        let value = raw.as_ref().trim();
        if value.is_empty() {
            return Err(ClientValidationError::EmptyName);
        }
        if value.chars().count() > CLIENT_NAME_MAX {
            return Err(ClientValidationError::NameTooLong {
                max: CLIENT_NAME_MAX,
            });
        }
        Ok(Self(value.to_owned()))
    }

    /// Borrow the name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-insensitive comparison against arbitrary text.
    pub fn matches(&self, other: &str) -> bool {
        self.0.to_lowercase() == other.trim().to_lowercase()
    }
}

impl fmt::Display for ClientName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<ClientName> for String {
    fn from(value: ClientName) -> Self {
        value.0
    }
}

impl TryFrom<String> for ClientName {
    type Error = ClientValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Reference to a client logo: a remote URL or an uploaded file path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum LogoRef {
    /// Absolute `http`/`https` URL.
    Remote(url::Url),
    /// Path under [`UPLOADS_PREFIX`].
    Upload(String),
}

impl LogoRef {
    /// Parse a logo reference.
    pub fn parse(raw: &str) -> Result<Self, ClientValidationError> {
        let value = raw.trim();
        if let Some(name) = value.strip_prefix(UPLOADS_PREFIX) {
            if name.is_empty() || name.contains('/') || name.contains("..") {
                return Err(ClientValidationError::InvalidLogo);
            }
            return Ok(Self::Upload(value.to_owned()));
        }
        let url = url::Url::parse(value).map_err(|_| ClientValidationError::InvalidLogo)?;
        match url.scheme() {
            "http" | "https" => Ok(Self::Remote(url)),
            _ => Err(ClientValidationError::InvalidLogo),
        }
    }

    /// Name of the stored upload, when the logo is a local file.
    pub fn upload_name(&self) -> Option<&str> {
        match self {
            Self::Upload(path) => path.strip_prefix(UPLOADS_PREFIX),
            Self::Remote(_) => None,
        }
    }

    /// Render the reference as a string.
    pub fn as_string(&self) -> String {
        match self {
            Self::Remote(url) => url.to_string(),
            Self::Upload(path) => path.clone(),
        }
    }
}

impl From<LogoRef> for String {
    fn from(value: LogoRef) -> Self {
        value.as_string()
    }
}

impl TryFrom<String> for LogoRef {
    type Error = ClientValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// Organisation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Stable identifier.
    #[schema(value_type = String, format = Uuid)]
    pub id: ClientId,
    /// Unique (case-insensitive) name.
    #[schema(value_type = String)]
    pub name: ClientName,
    /// Optional logo reference.
    #[schema(value_type = Option<String>)]
    pub logo: Option<LogoRef>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Organisation branding shown on report headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClientBranding {
    /// Organisation name.
    pub name: String,
    /// Logo reference, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
}

impl From<&Client> for ClientBranding {
    fn from(client: &Client) -> Self {
        Self {
            name: client.name.to_string(),
            logo: client.logo.as_ref().map(LogoRef::as_string),
        }
    }
}

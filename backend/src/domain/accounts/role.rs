//! Account roles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Role held by a user. Ordering follows privilege: `User < Admin < Superadmin`.
///
/// # Examples
/// ```
/// use safety_backend::domain::Role;
///
/// assert!(Role::Superadmin > Role::Admin);
/// assert!(Role::Admin.is_at_least(Role::User));
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Read and self-service access.
    User,
    /// May manage clients and users of their organisation.
    Admin,
    /// Platform-wide access.
    Superadmin,
}

impl Role {
    /// Return `true` when this role is `minimum` or higher.
    pub fn is_at_least(self, minimum: Self) -> bool {
        self >= minimum
    }

    /// Stable lowercase tag used in storage and sessions.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::Superadmin => "superadmin",
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Self::User
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a role tag is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role '{0}'")]
pub struct UnknownRoleError(pub String);

impl FromStr for Role {
    type Err = UnknownRoleError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            "superadmin" => Ok(Self::Superadmin),
            _ => Err(UnknownRoleError(value.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Role::User, Role::User, true)]
    #[case(Role::User, Role::Admin, false)]
    #[case(Role::Admin, Role::User, true)]
    #[case(Role::Admin, Role::Superadmin, false)]
    #[case(Role::Superadmin, Role::Admin, true)]
    fn privilege_ordering(#[case] role: Role, #[case] minimum: Role, #[case] expected: bool) {
        assert_eq!(role.is_at_least(minimum), expected);
    }

    #[rstest]
    #[case("user", Role::User)]
    #[case("ADMIN", Role::Admin)]
    #[case(" superadmin ", Role::Superadmin)]
    fn parses_tags(#[case] raw: &str, #[case] expected: Role) {
        assert_eq!(raw.parse::<Role>(), Ok(expected));
    }

    #[rstest]
    fn rejects_unknown_tags() {
        assert!("owner".parse::<Role>().is_err());
    }
}

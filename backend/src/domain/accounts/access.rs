//! Caller identity and tenant scoping rules.
//!
//! Every read or write that crosses organisations goes through
//! [`AccessPolicy`]. One configured organisation (the platform operator) and
//! the `superadmin` role see everything; everyone else is confined to their
//! own organisation.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::client::ClientId;
use super::role::Role;
use super::user::{User, UserId};

/// Default name of the platform operator organisation.
pub const DEFAULT_OPERATOR_ORG: &str = "Safetynett";

/// Authenticated identity decoded from the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Caller {
    /// Authenticated user.
    #[schema(value_type = String, format = Uuid)]
    pub user_id: UserId,
    /// Email address at login time.
    pub email: String,
    /// Role at login time.
    pub role: Role,
    /// Organisation at login time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = Uuid)]
    pub client_id: Option<ClientId>,
    /// Organisation name at login time.
    pub companyname: String,
}

impl From<&User> for Caller {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            email: user.email.clone(),
            role: user.role,
            client_id: user.client_id,
            companyname: user.companyname.clone(),
        }
    }
}

/// Scoping rules parameterised by the operator organisation name.
///
/// # Examples
/// ```
/// use safety_backend::domain::{AccessPolicy, Caller, Role, UserId};
///
/// let policy = AccessPolicy::default();
/// let caller = Caller {
///     user_id: UserId::random(),
///     email: "ops@safetynett.example".into(),
///     role: Role::User,
///     client_id: None,
///     companyname: "SAFETYNETT".into(),
/// };
/// assert!(policy.is_platform_wide(&caller));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    operator_org: String,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_OPERATOR_ORG)
    }
}

fn same_org(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

impl AccessPolicy {
    /// Build a policy for the given operator organisation.
    pub fn new(operator_org: impl Into<String>) -> Self {
        Self {
            operator_org: operator_org.into(),
        }
    }

    /// Operator organisation name.
    pub fn operator_org(&self) -> &str {
        &self.operator_org
    }

    /// Return `true` when `name` designates the operator organisation.
    pub fn is_operator_org(&self, name: &str) -> bool {
        same_org(name, &self.operator_org)
    }

    /// Superadmins and operator members see every tenant.
    pub fn is_platform_wide(&self, caller: &Caller) -> bool {
        caller.role == Role::Superadmin || self.is_operator_org(&caller.companyname)
    }

    /// Whether `caller` may see `user`.
    pub fn can_see_user(&self, caller: &Caller, user: &User) -> bool {
        self.is_platform_wide(caller)
            || caller.user_id == user.id
            || same_org(&caller.companyname, &user.companyname)
    }

    /// Filter `users` down to what `caller` may list.
    pub fn scope_users(&self, caller: &Caller, users: Vec<User>) -> Vec<User> {
        if self.is_platform_wide(caller) {
            return users;
        }
        users
            .into_iter()
            .filter(|user| self.can_see_user(caller, user))
            .collect()
    }

    /// Whether `caller` may change another user's role, status or record.
    pub fn can_manage_user(&self, caller: &Caller, target: &User) -> bool {
        caller.role.is_at_least(Role::Admin)
            && caller.role >= target.role
            && (self.is_platform_wide(caller) || same_org(&caller.companyname, &target.companyname))
    }

    /// Whether `caller` may edit `target`'s profile fields.
    pub fn can_edit_profile(&self, caller: &Caller, target: &User) -> bool {
        caller.user_id == target.id || self.can_manage_user(caller, target)
    }

    /// Whether `caller` may read the client record `client`.
    pub fn can_see_client(&self, caller: &Caller, client: ClientId) -> bool {
        self.is_platform_wide(caller) || caller.client_id == Some(client)
    }

    /// Whether `caller` may create clients.
    pub fn can_create_clients(&self, caller: &Caller) -> bool {
        caller.role.is_at_least(Role::Admin)
    }

    /// Whether `caller` may update or delete the client `client`.
    pub fn can_manage_client(&self, caller: &Caller, client: ClientId) -> bool {
        caller.role.is_at_least(Role::Admin) && self.can_see_client(caller, client)
    }

    /// Whether `caller` may read or modify a response.
    pub fn can_access_response(
        &self,
        caller: &Caller,
        submitted_by: Option<&UserId>,
        client: Option<ClientId>,
    ) -> bool {
        if submitted_by == Some(&caller.user_id) || self.is_platform_wide(caller) {
            return true;
        }
        caller.role.is_at_least(Role::Admin) && client.is_some() && client == caller.client_id
    }

    /// Whether `caller` may replace a form definition.
    pub fn can_edit_form(&self, caller: &Caller, created_by: &UserId) -> bool {
        &caller.user_id == created_by || self.is_platform_wide(caller)
    }

    /// Whether `caller` may delete a form owned by a user of `owner_client`.
    pub fn can_delete_form(
        &self,
        caller: &Caller,
        created_by: &UserId,
        owner_client: Option<ClientId>,
    ) -> bool {
        if self.can_edit_form(caller, created_by) {
            return true;
        }
        caller.role.is_at_least(Role::Admin)
            && owner_client.is_some()
            && owner_client == caller.client_id
    }
}

#[cfg(test)]
#[path = "access_tests.rs"]
mod tests;

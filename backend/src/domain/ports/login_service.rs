//! Driving port for login and sign-up use-cases.
//!
//! Inbound adapters call it to authenticate credentials or register accounts
//! without knowing the backing infrastructure, so HTTP handler tests can
//! substitute a test double instead of wiring persistence.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Registration, User};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated, active user.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;

    /// Create an account, resolving or creating its organisation.
    async fn register(&self, registration: Registration) -> Result<User, Error>;
}

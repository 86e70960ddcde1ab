//! Driving port for session login.
//!
//! Inbound adapters call this port to check credentials without knowing how
//! accounts are stored, so handler tests can substitute a test double.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, User};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user.
    ///
    /// Unknown usernames and wrong passwords both yield the same
    /// `Unauthorized` error.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, Error>;
}

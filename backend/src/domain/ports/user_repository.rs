//! Port abstraction for user account lookups.
use async_trait::async_trait;

use crate::domain::{User, UserId, Username};

use super::define_repository_error;

define_repository_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        connection => "user repository connection failed: {message}",
        query => "user repository query failed: {message}",
    }
}

/// A user together with the stored password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    /// Account the hash belongs to.
    pub user: User,
    /// Argon2 PHC string.
    pub password_hash: String,
}

/// Input for registering an account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Unique public handle.
    pub username: Username,
    /// Argon2 PHC string.
    pub password_hash: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Store a new account and return it. Usernames are unique.
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user and password hash for login.
    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;
}

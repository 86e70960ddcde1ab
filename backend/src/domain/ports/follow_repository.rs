//! Port abstraction for follow edges.
//!
//! Each `(user, author)` pair is stored at most once and a user never
//! follows themself; adapters enforce both at the storage level.
use async_trait::async_trait;

use crate::domain::UserId;

use super::define_repository_error;

define_repository_error! {
    /// Persistence errors raised by follow repository adapters.
    pub enum FollowRepositoryError {
        connection => "follow repository connection failed: {message}",
        query => "follow repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowRepository: Send + Sync {
    /// Whether `user` follows `author`.
    async fn exists(&self, user: &UserId, author: &UserId) -> Result<bool, FollowRepositoryError>;

    /// Store the edge unless it exists. Returns `true` when a row was added.
    async fn insert_if_absent(
        &self,
        user: &UserId,
        author: &UserId,
    ) -> Result<bool, FollowRepositoryError>;

    /// Delete the edge. Returns `true` when a row was removed.
    async fn delete(&self, user: &UserId, author: &UserId) -> Result<bool, FollowRepositoryError>;
}

//! Port abstraction for post storage and feed queries.
//!
//! Listings are always ordered newest first, `created_at DESC, id DESC`, so
//! posts created within the same instant still page deterministically.
use async_trait::async_trait;

use crate::domain::{GroupId, NewPost, Post, PostId, PostUpdate, UserId};

use super::define_repository_error;

define_repository_error! {
    /// Persistence errors raised by post repository adapters.
    pub enum PostRepositoryError {
        connection => "post repository connection failed: {message}",
        query => "post repository query failed: {message}",
    }
}

/// Which posts a feed covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    /// Every post.
    All,
    /// Posts filed under a group.
    Group(GroupId),
    /// Posts written by an author.
    Author(UserId),
    /// Posts written by anyone the given reader follows.
    FollowedBy(UserId),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Number of posts matching `filter`.
    async fn count(&self, filter: &PostFilter) -> Result<u64, PostRepositoryError>;

    /// One window of posts matching `filter`, newest first.
    async fn list(
        &self,
        filter: &PostFilter,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Post>, PostRepositoryError>;

    /// Fetch a post by identifier.
    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError>;

    /// Store a new post, stamping its creation time.
    async fn create(&self, post: &NewPost) -> Result<Post, PostRepositoryError>;

    /// Overwrite the mutable fields of an existing post.
    ///
    /// Returns `None` when the post no longer exists.
    async fn update(
        &self,
        id: PostId,
        update: &PostUpdate,
    ) -> Result<Option<Post>, PostRepositoryError>;
}

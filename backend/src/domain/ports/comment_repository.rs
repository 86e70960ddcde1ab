//! Port abstraction for comment storage.
use async_trait::async_trait;

use crate::domain::{Comment, NewComment, PostId};

use super::define_repository_error;

define_repository_error! {
    /// Persistence errors raised by comment repository adapters.
    pub enum CommentRepositoryError {
        connection => "comment repository connection failed: {message}",
        query => "comment repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Comments on a post, oldest first.
    async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, CommentRepositoryError>;

    /// Store a new comment, stamping its creation time.
    async fn create(&self, comment: &NewComment) -> Result<Comment, CommentRepositoryError>;
}

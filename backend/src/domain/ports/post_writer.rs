//! Driving port for writing posts and comments.
//!
//! Every operation checks authentication first. Edits then check existence
//! and authorship, and only then validate the submission, so refused
//! requests never reach storage.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{
    Comment, CommentSubmission, Error, Group, Post, PostId, PostSubmission, UserId,
};

/// Context for rendering the post form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostForm {
    /// Groups the post may be filed under.
    pub groups: Vec<Group>,
    /// The post being edited, absent when creating.
    pub post: Option<Post>,
}

impl PostForm {
    /// Whether this form edits an existing post.
    pub fn is_edit(&self) -> bool {
        self.post.is_some()
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostWriter: Send + Sync {
    /// Context for an empty post form.
    async fn create_form(&self, actor: Option<UserId>) -> Result<PostForm, Error>;

    /// Publish a post authored by `actor`.
    async fn create_post(
        &self,
        actor: Option<UserId>,
        submission: PostSubmission,
    ) -> Result<Post, Error>;

    /// Context for editing `post_id`; only its author may see it.
    async fn edit_form(&self, actor: Option<UserId>, post_id: PostId) -> Result<PostForm, Error>;

    /// Replace the text, group and image of `post_id`.
    ///
    /// An absent image keeps the stored one.
    async fn edit_post(
        &self,
        actor: Option<UserId>,
        post_id: PostId,
        submission: PostSubmission,
    ) -> Result<Post, Error>;

    /// Comment on `post_id` as `actor`.
    async fn add_comment(
        &self,
        actor: Option<UserId>,
        post_id: PostId,
        submission: CommentSubmission,
    ) -> Result<Comment, Error>;
}

//! Post and comment domain service.
//!
//! Implements [`PostWriter`]. Authentication is checked before anything
//! else; edits are authorised against the stored post before the submission
//! is validated, so a refused edit never touches storage.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{
    CommentRepository, GroupRepository, PostForm, PostRepository, PostWriter,
};
use crate::domain::{
    Comment, CommentSubmission, Error, FieldErrors, GroupId, NewComment, NewPost, Post, PostId,
    PostSubmission, PostUpdate, UserId, ValidPostSubmission, authorize_post_edit,
};

/// Post service implementing the [`PostWriter`] driving port.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    groups: Arc<dyn GroupRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl PostService {
    /// Create a post service over the post, group and comment repositories.
    pub fn new(
        posts: Arc<dyn PostRepository>,
        groups: Arc<dyn GroupRepository>,
        comments: Arc<dyn CommentRepository>,
    ) -> Self {
        Self {
            posts,
            groups,
            comments,
        }
    }

    async fn load_post(&self, id: PostId) -> Result<Post, Error> {
        self.posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("post {id} not found")))
    }

    async fn load_editable(&self, actor: Option<UserId>, id: PostId) -> Result<Post, Error> {
        let actor = require_actor(actor)?;
        let post = self.load_post(id).await?;
        authorize_post_edit(Some(&actor), &post).into_result()?;
        Ok(post)
    }

    /// Validate a submission and confirm its group exists.
    async fn accept(&self, submission: &PostSubmission) -> Result<ValidPostSubmission, Error> {
        let valid = submission.validate().map_err(FieldErrors::into_error)?;
        if let Some(group) = valid.group {
            self.ensure_group_exists(group).await?;
        }
        Ok(valid)
    }

    async fn ensure_group_exists(&self, group: GroupId) -> Result<(), Error> {
        if self.groups.find_by_id(group).await?.is_some() {
            return Ok(());
        }
        debug!(%group, "submission names an unknown group");
        let mut errors = FieldErrors::default();
        errors.add("group", "select a valid choice");
        Err(errors.into_error())
    }
}

fn require_actor(actor: Option<UserId>) -> Result<UserId, Error> {
    actor.ok_or_else(|| Error::unauthorized("login required"))
}

#[async_trait]
impl PostWriter for PostService {
    async fn create_form(&self, actor: Option<UserId>) -> Result<PostForm, Error> {
        require_actor(actor)?;
        Ok(PostForm {
            groups: self.groups.list().await?,
            post: None,
        })
    }

    async fn create_post(
        &self,
        actor: Option<UserId>,
        submission: PostSubmission,
    ) -> Result<Post, Error> {
        let author = require_actor(actor)?;
        let valid = self.accept(&submission).await?;
        let post = self
            .posts
            .create(&NewPost {
                author,
                text: valid.text,
                group: valid.group,
                image: valid.image,
            })
            .await?;
        info!(post = %post.id(), author = %author, "post created");
        Ok(post)
    }

    async fn edit_form(&self, actor: Option<UserId>, post_id: PostId) -> Result<PostForm, Error> {
        let post = self.load_editable(actor, post_id).await?;
        Ok(PostForm {
            groups: self.groups.list().await?,
            post: Some(post),
        })
    }

    async fn edit_post(
        &self,
        actor: Option<UserId>,
        post_id: PostId,
        submission: PostSubmission,
    ) -> Result<Post, Error> {
        let current = self.load_editable(actor, post_id).await?;
        let valid = self.accept(&submission).await?;
        let update = PostUpdate {
            text: valid.text,
            group: valid.group,
            image: valid.image.or_else(|| current.image().cloned()),
        };
        let post = self
            .posts
            .update(post_id, &update)
            .await?
            .ok_or_else(|| Error::not_found(format!("post {post_id} not found")))?;
        info!(post = %post_id, "post edited");
        Ok(post)
    }

    async fn add_comment(
        &self,
        actor: Option<UserId>,
        post_id: PostId,
        submission: CommentSubmission,
    ) -> Result<Comment, Error> {
        let author = require_actor(actor)?;
        self.load_post(post_id).await?;
        let valid = submission.validate().map_err(FieldErrors::into_error)?;
        let comment = self
            .comments
            .create(&NewComment {
                post_id,
                author,
                text: valid.text,
            })
            .await?;
        info!(post = %post_id, comment = comment.id().get(), "comment added");
        Ok(comment)
    }
}

#[cfg(test)]
#[path = "post_service_tests.rs"]
mod tests;

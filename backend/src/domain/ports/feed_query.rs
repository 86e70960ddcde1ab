//! Driving port for reading feeds and post pages.
//!
//! Page numbers arrive already parsed; requests past the last page are
//! clamped by the implementation, so every call yields exactly one page.

use async_trait::async_trait;
use pagination::{Page, PageNumber};
use serde::Serialize;

use crate::domain::{Comment, Error, Group, Post, PostId, User, UserId};

/// One page of posts, newest first.
pub type FeedPage = Page<Post>;

/// A group with one page of its posts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupFeed {
    /// The group being viewed.
    pub group: Group,
    /// Its posts.
    pub posts: FeedPage,
}

/// An author's profile with one page of their posts.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorFeed {
    /// The author being viewed.
    pub author: User,
    /// Total number of posts by the author.
    pub post_count: u64,
    /// Whether the viewer follows the author; `None` for anonymous viewers.
    pub following: Option<bool>,
    /// The author's posts.
    pub posts: FeedPage,
}

/// A single post with its discussion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    /// The post.
    pub post: Post,
    /// Total number of posts by the post's author.
    pub author_post_count: u64,
    /// Comments, oldest first.
    pub comments: Vec<Comment>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FeedQuery: Send + Sync {
    /// Every post.
    async fn global_feed(&self, page: PageNumber) -> Result<FeedPage, Error>;

    /// Posts in the group addressed by `slug`. Unknown slugs are `NotFound`.
    async fn group_feed(&self, slug: &str, page: PageNumber) -> Result<GroupFeed, Error>;

    /// Posts by `username`. Unknown usernames are `NotFound`.
    async fn author_feed(
        &self,
        viewer: Option<UserId>,
        username: &str,
        page: PageNumber,
    ) -> Result<AuthorFeed, Error>;

    /// Posts by authors the viewer follows. Anonymous viewers are refused.
    async fn following_feed(&self, viewer: Option<UserId>, page: PageNumber)
    -> Result<FeedPage, Error>;

    /// A post with its comments. Unknown ids are `NotFound`.
    async fn post_detail(&self, id: PostId) -> Result<PostDetail, Error>;
}

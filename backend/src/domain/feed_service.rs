//! Feed domain service.
//!
//! Implements [`FeedQuery`] over the post, group, user, comment and follow
//! repositories. Each feed is counted first so the requested page can be
//! clamped before the window is fetched.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{PageNumber, Paginator};
use tracing::debug;

use crate::domain::ports::{
    AuthorFeed, CommentRepository, FeedPage, FeedQuery, FollowRepository, GroupFeed,
    GroupRepository, PostDetail, PostFilter, PostRepository, UserRepository,
};
use crate::domain::{Error, GroupSlug, PostId, UserId, Username};

/// Feed service implementing the [`FeedQuery`] driving port.
#[derive(Clone)]
pub struct FeedService {
    posts: Arc<dyn PostRepository>,
    groups: Arc<dyn GroupRepository>,
    users: Arc<dyn UserRepository>,
    comments: Arc<dyn CommentRepository>,
    follows: Arc<dyn FollowRepository>,
    paginator: Paginator,
}

impl FeedService {
    /// Create a feed service paging with `paginator`.
    pub fn new(
        posts: Arc<dyn PostRepository>,
        groups: Arc<dyn GroupRepository>,
        users: Arc<dyn UserRepository>,
        comments: Arc<dyn CommentRepository>,
        follows: Arc<dyn FollowRepository>,
        paginator: Paginator,
    ) -> Self {
        Self {
            posts,
            groups,
            users,
            comments,
            follows,
            paginator,
        }
    }

    async fn page_of(&self, filter: PostFilter, page: PageNumber) -> Result<FeedPage, Error> {
        let total = self.posts.count(&filter).await?;
        let window = self.paginator.window(page, total);
        let items = self
            .posts
            .list(&filter, window.offset(), window.limit())
            .await?;
        debug!(
            ?filter,
            requested = page.get(),
            served = window.number().get(),
            total,
            "feed page loaded"
        );
        Ok(window.into_page(items))
    }
}

fn group_not_found(slug: &str) -> Error {
    Error::not_found(format!("group {slug} not found"))
}

fn author_not_found(username: &str) -> Error {
    Error::not_found(format!("user {username} not found"))
}

#[async_trait]
impl FeedQuery for FeedService {
    async fn global_feed(&self, page: PageNumber) -> Result<FeedPage, Error> {
        self.page_of(PostFilter::All, page).await
    }

    async fn group_feed(&self, slug: &str, page: PageNumber) -> Result<GroupFeed, Error> {
        let parsed = GroupSlug::new(slug).map_err(|_| group_not_found(slug))?;
        let group = self
            .groups
            .find_by_slug(&parsed)
            .await?
            .ok_or_else(|| group_not_found(slug))?;
        let posts = self.page_of(PostFilter::Group(group.id()), page).await?;
        Ok(GroupFeed { group, posts })
    }

    async fn author_feed(
        &self,
        viewer: Option<UserId>,
        username: &str,
        page: PageNumber,
    ) -> Result<AuthorFeed, Error> {
        let parsed = Username::new(username).map_err(|_| author_not_found(username))?;
        let author = self
            .users
            .find_by_username(&parsed)
            .await?
            .ok_or_else(|| author_not_found(username))?;

        let posts = self.page_of(PostFilter::Author(*author.id()), page).await?;
        let following = match viewer {
            Some(viewer) => Some(self.follows.exists(&viewer, author.id()).await?),
            None => None,
        };

        Ok(AuthorFeed {
            post_count: posts.total(),
            author,
            following,
            posts,
        })
    }

    async fn following_feed(
        &self,
        viewer: Option<UserId>,
        page: PageNumber,
    ) -> Result<FeedPage, Error> {
        let viewer = viewer.ok_or_else(|| Error::unauthorized("login required"))?;
        self.page_of(PostFilter::FollowedBy(viewer), page).await
    }

    async fn post_detail(&self, id: PostId) -> Result<PostDetail, Error> {
        let post = self
            .posts
            .find_by_id(id)
            .await?
            .ok_or_else(|| Error::not_found(format!("post {id} not found")))?;
        let author_post_count = self
            .posts
            .count(&PostFilter::Author(*post.author().id()))
            .await?;
        let comments = self.comments.list_for_post(id).await?;
        Ok(PostDetail {
            post,
            author_post_count,
            comments,
        })
    }
}

#[cfg(test)]
#[path = "feed_service_tests.rs"]
mod tests;

//! Parameter object bundling the driven repository ports.

use std::sync::Arc;

use super::{CommentRepository, FollowRepository, GroupRepository, PostRepository, UserRepository};

/// One implementation of every repository port, typically sharing a backend.
#[derive(Clone)]
pub struct Repositories {
    /// Accounts.
    pub users: Arc<dyn UserRepository>,
    /// Groups.
    pub groups: Arc<dyn GroupRepository>,
    /// Posts.
    pub posts: Arc<dyn PostRepository>,
    /// Comments.
    pub comments: Arc<dyn CommentRepository>,
    /// Follow edges.
    pub follows: Arc<dyn FollowRepository>,
}

//! Driving port for following and unfollowing authors.

use async_trait::async_trait;

use crate::domain::{Error, FollowOutcome, UnfollowOutcome, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FollowCommand: Send + Sync {
    /// Follow `username`. Repeats and self-follows are harmless no-ops.
    async fn follow(&self, actor: Option<UserId>, username: &str)
    -> Result<FollowOutcome, Error>;

    /// Stop following `username`. Removing an absent edge is not an error.
    async fn unfollow(
        &self,
        actor: Option<UserId>,
        username: &str,
    ) -> Result<UnfollowOutcome, Error>;
}

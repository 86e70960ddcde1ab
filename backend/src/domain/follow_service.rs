//! Follow domain service.
//!
//! Checks run in a fixed order: authentication, then target lookup, then the
//! self-follow guard. Nothing is written until all three pass.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{FollowCommand, FollowRepository, UserRepository};
use crate::domain::{Error, FollowOutcome, UnfollowOutcome, User, UserId, Username};

/// Follow service implementing the [`FollowCommand`] driving port.
#[derive(Clone)]
pub struct FollowService {
    users: Arc<dyn UserRepository>,
    follows: Arc<dyn FollowRepository>,
}

impl FollowService {
    /// Create a follow service over the user and follow repositories.
    pub fn new(users: Arc<dyn UserRepository>, follows: Arc<dyn FollowRepository>) -> Self {
        Self { users, follows }
    }

    async fn resolve_target(&self, username: &str) -> Result<User, Error> {
        let not_found = || Error::not_found(format!("user {username} not found"));
        let parsed = Username::new(username).map_err(|_| not_found())?;
        self.users
            .find_by_username(&parsed)
            .await?
            .ok_or_else(not_found)
    }
}

fn require_actor(actor: Option<UserId>) -> Result<UserId, Error> {
    actor.ok_or_else(|| Error::unauthorized("login required"))
}

#[async_trait]
impl FollowCommand for FollowService {
    async fn follow(
        &self,
        actor: Option<UserId>,
        username: &str,
    ) -> Result<FollowOutcome, Error> {
        let actor = require_actor(actor)?;
        let author = self.resolve_target(username).await?;
        if author.id() == &actor {
            return Ok(FollowOutcome::SelfFollowIgnored);
        }
        if self.follows.exists(&actor, author.id()).await? {
            return Ok(FollowOutcome::AlreadyFollowing);
        }

        let outcome = if self.follows.insert_if_absent(&actor, author.id()).await? {
            info!(user = %actor, author = %author.id(), "follow created");
            FollowOutcome::Created
        } else {
            FollowOutcome::AlreadyFollowing
        };
        Ok(outcome)
    }

    async fn unfollow(
        &self,
        actor: Option<UserId>,
        username: &str,
    ) -> Result<UnfollowOutcome, Error> {
        let actor = require_actor(actor)?;
        let author = self.resolve_target(username).await?;
        if self.follows.delete(&actor, author.id()).await? {
            info!(user = %actor, author = %author.id(), "follow removed");
            Ok(UnfollowOutcome::Removed)
        } else {
            Ok(UnfollowOutcome::NotFollowing)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::fixtures;
    use crate::domain::ports::{MockFollowRepository, MockUserRepository};
    use rstest::{fixture, rstest};

    #[fixture]
    fn author() -> User {
        fixtures::user("leo")
    }

    fn users_finding(user: Option<User>) -> MockUserRepository {
        let mut users = MockUserRepository::new();
        users
            .expect_find_by_username()
            .return_once(move |_| Ok(user));
        users
    }

    fn service(users: MockUserRepository, follows: MockFollowRepository) -> FollowService {
        FollowService::new(Arc::new(users), Arc::new(follows))
    }

    #[rstest]
    #[tokio::test]
    async fn follow_creates_a_missing_edge(author: User) {
        let reader = *fixtures::user("mia").id();
        let mut follows = MockFollowRepository::new();
        follows.expect_exists().return_once(|_, _| Ok(false));
        follows
            .expect_insert_if_absent()
            .times(1)
            .return_once(|_, _| Ok(true));

        let outcome = service(users_finding(Some(author)), follows)
            .follow(Some(reader), "leo")
            .await
            .expect("follow succeeds");

        assert_eq!(outcome, FollowOutcome::Created);
    }

    #[rstest]
    #[tokio::test]
    async fn repeated_follows_do_not_insert(author: User) {
        let reader = *fixtures::user("mia").id();
        let mut follows = MockFollowRepository::new();
        follows.expect_exists().return_once(|_, _| Ok(true));
        follows.expect_insert_if_absent().times(0);

        let outcome = service(users_finding(Some(author)), follows)
            .follow(Some(reader), "leo")
            .await
            .expect("follow succeeds");

        assert_eq!(outcome, FollowOutcome::AlreadyFollowing);
    }

    #[rstest]
    #[tokio::test]
    async fn a_lost_insert_race_reports_already_following(author: User) {
        let reader = *fixtures::user("mia").id();
        let mut follows = MockFollowRepository::new();
        follows.expect_exists().return_once(|_, _| Ok(false));
        follows
            .expect_insert_if_absent()
            .return_once(|_, _| Ok(false));

        let outcome = service(users_finding(Some(author)), follows)
            .follow(Some(reader), "leo")
            .await
            .expect("follow succeeds");

        assert_eq!(outcome, FollowOutcome::AlreadyFollowing);
    }

    #[rstest]
    #[tokio::test]
    async fn self_follows_are_ignored(author: User) {
        let me = *author.id();
        let mut follows = MockFollowRepository::new();
        follows.expect_exists().times(0);
        follows.expect_insert_if_absent().times(0);

        let outcome = service(users_finding(Some(author)), follows)
            .follow(Some(me), "leo")
            .await
            .expect("self follow is a no-op");

        assert_eq!(outcome, FollowOutcome::SelfFollowIgnored);
    }

    #[rstest]
    #[tokio::test]
    async fn anonymous_follows_are_refused_before_lookup() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_username().times(0);
        let mut follows = MockFollowRepository::new();
        follows.expect_insert_if_absent().times(0);

        let error = service(users, follows)
            .follow(None, "leo")
            .await
            .expect_err("login required");

        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_targets_are_not_found() {
        let reader = *fixtures::user("mia").id();
        let mut follows = MockFollowRepository::new();
        follows.expect_insert_if_absent().times(0);

        let error = service(users_finding(None), follows)
            .follow(Some(reader), "ghost")
            .await
            .expect_err("unknown author");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[case(true, UnfollowOutcome::Removed)]
    #[case(false, UnfollowOutcome::NotFollowing)]
    #[tokio::test]
    async fn unfollow_reports_whether_an_edge_was_removed(
        author: User,
        #[case] removed: bool,
        #[case] expected: UnfollowOutcome,
    ) {
        let reader = *fixtures::user("mia").id();
        let mut follows = MockFollowRepository::new();
        follows.expect_delete().return_once(move |_, _| Ok(removed));

        let outcome = service(users_finding(Some(author)), follows)
            .unfollow(Some(reader), "leo")
            .await
            .expect("unfollow never fails on absent edges");

        assert_eq!(outcome, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn anonymous_unfollows_are_refused() {
        let error = service(MockUserRepository::new(), MockFollowRepository::new())
            .unfollow(None, "leo")
            .await
            .expect_err("login required");

        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }
}

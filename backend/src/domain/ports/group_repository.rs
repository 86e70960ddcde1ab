//! Port abstraction for group storage.
use async_trait::async_trait;

use crate::domain::{Group, GroupId, GroupSlug, NewGroup};

use super::define_repository_error;

define_repository_error! {
    /// Persistence errors raised by group repository adapters.
    pub enum GroupRepositoryError {
        connection => "group repository connection failed: {message}",
        query => "group repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GroupRepository: Send + Sync {
    /// Store a new group. Slugs are unique.
    async fn create(&self, group: &NewGroup) -> Result<Group, GroupRepositoryError>;

    /// Fetch a group by identifier.
    async fn find_by_id(&self, id: GroupId) -> Result<Option<Group>, GroupRepositoryError>;

    /// Fetch a group by slug.
    async fn find_by_slug(&self, slug: &GroupSlug) -> Result<Option<Group>, GroupRepositoryError>;

    /// All groups ordered by title, for form choices.
    async fn list(&self) -> Result<Vec<Group>, GroupRepositoryError>;
}

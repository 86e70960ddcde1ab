//! PostgreSQL-backed `GroupRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{GroupRepository, GroupRepositoryError};
use crate::domain::{Group, GroupId, GroupSlug, NewGroup};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{GroupRow, NewGroupRow};
use super::pool::{DbPool, PoolError};
use super::schema::groups;

/// Diesel-backed implementation of the group repository port.
#[derive(Clone)]
pub struct DieselGroupRepository {
    pool: DbPool,
}

impl DieselGroupRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> GroupRepositoryError {
    map_basic_pool_error(error, GroupRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> GroupRepositoryError {
    map_basic_diesel_error(
        error,
        GroupRepositoryError::query,
        GroupRepositoryError::connection,
    )
}

/// Convert a row into a domain group.
pub(super) fn group_from_row(row: GroupRow) -> Result<Group, String> {
    let id = GroupId::new(row.id).map_err(|err| err.to_string())?;
    let slug = GroupSlug::new(row.slug).map_err(|err| err.to_string())?;
    Ok(Group::from_parts(id, row.title, slug, row.description))
}

fn convert(row: GroupRow) -> Result<Group, GroupRepositoryError> {
    group_from_row(row).map_err(GroupRepositoryError::query)
}

#[async_trait]
impl GroupRepository for DieselGroupRepository {
    async fn create(&self, group: &NewGroup) -> Result<Group, GroupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(groups::table)
            .values(&NewGroupRow {
                title: group.title(),
                slug: group.slug().as_str(),
                description: group.description(),
            })
            .returning(GroupRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        convert(row)
    }

    async fn find_by_id(&self, id: GroupId) -> Result<Option<Group>, GroupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        groups::table
            .find(id.get())
            .select(GroupRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(convert)
            .transpose()
    }

    async fn find_by_slug(&self, slug: &GroupSlug) -> Result<Option<Group>, GroupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        groups::table
            .filter(groups::slug.eq(slug.as_str()))
            .select(GroupRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(convert)
            .transpose()
    }

    async fn list(&self) -> Result<Vec<Group>, GroupRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        groups::table
            .order((groups::title.asc(), groups::id.asc()))
            .select(GroupRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(convert)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn row(id: i64, slug: &str) -> GroupRow {
        GroupRow {
            id,
            title: "Cats".to_owned(),
            slug: slug.to_owned(),
            description: String::new(),
        }
    }

    #[rstest]
    fn valid_rows_become_groups() {
        let group = group_from_row(row(3, "cats")).expect("valid row");
        assert_eq!(group.id().get(), 3);
        assert_eq!(group.slug().as_str(), "cats");
    }

    #[rstest]
    #[case(0, "cats")]
    #[case(3, "Not a slug")]
    fn invalid_rows_are_rejected(#[case] id: i64, #[case] slug: &str) {
        assert!(group_from_row(row(id, slug)).is_err());
    }
}

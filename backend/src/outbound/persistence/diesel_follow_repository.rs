//! PostgreSQL-backed `FollowRepository` implementation using Diesel ORM.
//!
//! Uniqueness and the self-follow ban are table constraints; inserts use
//! `ON CONFLICT DO NOTHING` so concurrent follows of the same pair settle on
//! one row without an error.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::UserId;
use crate::domain::ports::{FollowRepository, FollowRepositoryError};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::NewFollowRow;
use super::pool::{DbPool, PoolError};
use super::schema::follows;

/// Diesel-backed implementation of the follow repository port.
#[derive(Clone)]
pub struct DieselFollowRepository {
    pool: DbPool,
}

impl DieselFollowRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> FollowRepositoryError {
    map_basic_pool_error(error, FollowRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> FollowRepositoryError {
    map_basic_diesel_error(
        error,
        FollowRepositoryError::query,
        FollowRepositoryError::connection,
    )
}

#[async_trait]
impl FollowRepository for DieselFollowRepository {
    async fn exists(&self, user: &UserId, author: &UserId) -> Result<bool, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            follows::table
                .filter(follows::user_id.eq(*user.as_uuid()))
                .filter(follows::author_id.eq(*author.as_uuid())),
        ))
        .get_result(&mut conn)
        .await
        .map_err(map_diesel_error)
    }

    async fn insert_if_absent(
        &self,
        user: &UserId,
        author: &UserId,
    ) -> Result<bool, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let inserted = diesel::insert_into(follows::table)
            .values(&NewFollowRow {
                user_id: *user.as_uuid(),
                author_id: *author.as_uuid(),
            })
            .on_conflict((follows::user_id, follows::author_id))
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted > 0)
    }

    async fn delete(&self, user: &UserId, author: &UserId) -> Result<bool, FollowRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(
            follows::table
                .filter(follows::user_id.eq(*user.as_uuid()))
                .filter(follows::author_id.eq(*author.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }
}

//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NewUser, StoredCredentials, UserPersistenceError, UserRepository};
use crate::domain::{User, UserId, Username};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{CredentialsRow, NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

/// Convert a row into a domain user, rejecting values that fail validation.
pub(super) fn user_from_row(row: UserRow) -> Result<User, String> {
    let username = Username::new(&row.username).map_err(|err| err.to_string())?;
    Ok(User::new(UserId::from_uuid(row.id), username))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = UserId::random();
        let row = diesel::insert_into(users::table)
            .values(&NewUserRow {
                id: *id.as_uuid(),
                username: user.username.as_str(),
                password_hash: &user.password_hash,
            })
            .returning(UserRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        user_from_row(row).map_err(UserPersistenceError::query)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(user_from_row)
            .transpose()
            .map_err(UserPersistenceError::query)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        users::table
            .filter(users::username.eq(username.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(user_from_row)
            .transpose()
            .map_err(UserPersistenceError::query)
    }

    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let Some(row) = users::table
            .filter(users::username.eq(username.as_str()))
            .select(CredentialsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
        else {
            return Ok(None);
        };
        let user = user_from_row(UserRow {
            id: row.id,
            username: row.username,
        })
        .map_err(UserPersistenceError::query)?;
        Ok(Some(StoredCredentials {
            user,
            password_hash: row.password_hash,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    fn valid_rows_become_users() {
        let id = Uuid::new_v4();
        let user = user_from_row(UserRow {
            id,
            username: "leo".to_owned(),
        })
        .expect("valid row");
        assert_eq!(user.id().as_uuid(), &id);
        assert_eq!(user.username().as_str(), "leo");
    }

    #[rstest]
    fn corrupt_usernames_are_rejected() {
        let result = user_from_row(UserRow {
            id: Uuid::new_v4(),
            username: "   ".to_owned(),
        });
        assert!(result.is_err());
    }
}

//! PostgreSQL-backed `CommentRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CommentRepository, CommentRepositoryError};
use crate::domain::{Comment, CommentId, CommentText, NewComment, PostId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_user_repository::user_from_row;
use super::models::{CommentRow, NewCommentRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{comments, users};

/// Diesel-backed implementation of the comment repository port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CommentRepositoryError {
    map_basic_pool_error(error, CommentRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CommentRepositoryError {
    map_basic_diesel_error(
        error,
        CommentRepositoryError::query,
        CommentRepositoryError::connection,
    )
}

fn comment_from_rows((comment, author): (CommentRow, UserRow)) -> Result<Comment, CommentRepositoryError> {
    let invalid =
        |err: String| CommentRepositoryError::query(format!("comment {}: {err}", comment.id));
    Ok(Comment::from_parts(
        CommentId::new(comment.id).map_err(|err| invalid(err.to_string()))?,
        PostId::new(comment.post_id).map_err(|err| invalid(err.to_string()))?,
        user_from_row(author).map_err(invalid)?,
        CommentText::new(&comment.text).map_err(|err| invalid(err.to_string()))?,
        comment.created_at,
    ))
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        comments::table
            .inner_join(users::table)
            .filter(comments::post_id.eq(post_id.get()))
            .order((comments::created_at.asc(), comments::id.asc()))
            .select((CommentRow::as_select(), UserRow::as_select()))
            .load::<(CommentRow, UserRow)>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(comment_from_rows)
            .collect()
    }

    async fn create(&self, comment: &NewComment) -> Result<Comment, CommentRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = diesel::insert_into(comments::table)
            .values(&NewCommentRow {
                post_id: comment.post_id.get(),
                author_id: *comment.author.as_uuid(),
                text: comment.text.as_str(),
            })
            .returning(CommentRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let author = users::table
            .find(row.author_id)
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        comment_from_rows((row, author))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    fn rows(text: &str) -> (CommentRow, UserRow) {
        let author = Uuid::new_v4();
        (
            CommentRow {
                id: 4,
                post_id: 9,
                author_id: author,
                text: text.to_owned(),
                created_at: Utc::now(),
            },
            UserRow {
                id: author,
                username: "mia".to_owned(),
            },
        )
    }

    #[rstest]
    fn joined_rows_resolve_the_author() {
        let comment = comment_from_rows(rows("nice")).expect("valid rows");
        assert_eq!(comment.post_id().get(), 9);
        assert_eq!(comment.author().username().as_str(), "mia");
    }

    #[rstest]
    fn blank_text_is_a_query_error() {
        let error = comment_from_rows(rows("  ")).expect_err("blank text");
        assert!(matches!(error, CommentRepositoryError::Query { .. }));
    }
}

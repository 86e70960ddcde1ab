//! PostgreSQL-backed `PostRepository` implementation using Diesel ORM.
//!
//! Posts are always read joined to their author and, when filed, their
//! group, so every returned [`Post`] is fully resolved.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PostFilter, PostRepository, PostRepositoryError};
use crate::domain::{ImageRef, NewPost, Post, PostId, PostText, PostUpdate};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_group_repository::group_from_row;
use super::diesel_user_repository::user_from_row;
use super::models::{GroupRow, NewPostRow, PostChangeset, PostRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{follows, groups, posts, users};

/// Diesel-backed implementation of the post repository port.
#[derive(Clone)]
pub struct DieselPostRepository {
    pool: DbPool,
}

impl DieselPostRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PostRepositoryError {
    map_basic_pool_error(error, PostRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PostRepositoryError {
    map_basic_diesel_error(
        error,
        PostRepositoryError::query,
        PostRepositoryError::connection,
    )
}

type PostJoinRow = (PostRow, UserRow, Option<GroupRow>);

fn post_from_rows((post, author, group): PostJoinRow) -> Result<Post, PostRepositoryError> {
    let invalid = |err: String| PostRepositoryError::query(format!("post {}: {err}", post.id));
    let id = PostId::new(post.id).map_err(|err| invalid(err.to_string()))?;
    let text = PostText::new(&post.text).map_err(|err| invalid(err.to_string()))?;
    let author = user_from_row(author).map_err(invalid)?;
    let group = group.map(group_from_row).transpose().map_err(invalid)?;
    let image = post
        .image
        .as_deref()
        .map(ImageRef::new)
        .transpose()
        .map_err(|err| invalid(err.to_string()))?;
    Ok(Post::from_parts(
        id,
        text,
        post.created_at,
        author,
        group,
        image,
    ))
}

/// Narrow a boxed `posts` query to the rows covered by `filter`.
macro_rules! apply_filter {
    ($query:expr, $filter:expr) => {
        match $filter {
            PostFilter::All => $query,
            PostFilter::Group(group) => $query.filter(posts::group_id.eq(group.get())),
            PostFilter::Author(author) => $query.filter(posts::author_id.eq(*author.as_uuid())),
            PostFilter::FollowedBy(reader) => $query.filter(
                posts::author_id.eq_any(
                    follows::table
                        .filter(follows::user_id.eq(*reader.as_uuid()))
                        .select(follows::author_id),
                ),
            ),
        }
    };
}

fn to_i64(value: u64, what: &str) -> Result<i64, PostRepositoryError> {
    i64::try_from(value).map_err(|_| PostRepositoryError::query(format!("{what} out of range")))
}

impl DieselPostRepository {
    async fn load_one(&self, id: i64) -> Result<Option<Post>, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        posts::table
            .inner_join(users::table)
            .left_join(groups::table)
            .filter(posts::id.eq(id))
            .select((
                PostRow::as_select(),
                UserRow::as_select(),
                Option::<GroupRow>::as_select(),
            ))
            .first::<PostJoinRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(post_from_rows)
            .transpose()
    }
}

#[async_trait]
impl PostRepository for DieselPostRepository {
    async fn count(&self, filter: &PostFilter) -> Result<u64, PostRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let query = posts::table.into_boxed();
        let total: i64 = apply_filter!(query, filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(u64::try_from(total).unwrap_or_default())
    }

    async fn list(
        &self,
        filter: &PostFilter,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Post>, PostRepositoryError> {
        let offset = to_i64(offset, "offset")?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let query = posts::table
            .inner_join(users::table)
            .left_join(groups::table)
            .into_boxed();
        apply_filter!(query, filter)
            .order((posts::created_at.desc(), posts::id.desc()))
            .offset(offset)
            .limit(i64::from(limit))
            .select((
                PostRow::as_select(),
                UserRow::as_select(),
                Option::<GroupRow>::as_select(),
            ))
            .load::<PostJoinRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(post_from_rows)
            .collect()
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError> {
        self.load_one(id.get()).await
    }

    async fn create(&self, post: &NewPost) -> Result<Post, PostRepositoryError> {
        let id: i64 = {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            diesel::insert_into(posts::table)
                .values(&NewPostRow {
                    text: post.text.as_str(),
                    author_id: *post.author.as_uuid(),
                    group_id: post.group.map(|group| group.get()),
                    image: post.image.as_ref().map(ImageRef::as_str),
                })
                .returning(posts::id)
                .get_result(&mut conn)
                .await
                .map_err(map_diesel_error)?
        };
        self.load_one(id)
            .await?
            .ok_or_else(|| PostRepositoryError::query(format!("post {id} vanished after insert")))
    }

    async fn update(
        &self,
        id: PostId,
        update: &PostUpdate,
    ) -> Result<Option<Post>, PostRepositoryError> {
        let updated = {
            let mut conn = self.pool.get().await.map_err(map_pool_error)?;
            diesel::update(posts::table.find(id.get()))
                .set(&PostChangeset {
                    text: update.text.as_str(),
                    group_id: update.group.map(|group| group.get()),
                    image: update.image.as_ref().map(ImageRef::as_str),
                })
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?
        };
        if updated == 0 {
            return Ok(None);
        }
        self.load_one(id.get()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    fn rows(image: Option<&str>, group: Option<GroupRow>) -> PostJoinRow {
        let author = Uuid::new_v4();
        (
            PostRow {
                id: 9,
                text: "hello world".to_owned(),
                created_at: Utc::now(),
                author_id: author,
                group_id: group.as_ref().map(|row| row.id),
                image: image.map(str::to_owned),
            },
            UserRow {
                id: author,
                username: "leo".to_owned(),
            },
            group,
        )
    }

    #[rstest]
    fn joined_rows_resolve_author_group_and_image() {
        let group = GroupRow {
            id: 2,
            title: "Cats".to_owned(),
            slug: "cats".to_owned(),
            description: String::new(),
        };
        let post = post_from_rows(rows(Some("media/cat.png"), Some(group))).expect("valid rows");

        assert_eq!(post.id().get(), 9);
        assert_eq!(post.author().username().as_str(), "leo");
        assert_eq!(post.group().map(|group| group.slug().as_str()), Some("cats"));
        assert_eq!(post.image().map(ImageRef::as_str), Some("media/cat.png"));
    }

    #[rstest]
    fn corrupt_images_surface_as_query_errors() {
        let error = post_from_rows(rows(Some("not an image"), None)).expect_err("bad image");
        assert!(matches!(error, PostRepositoryError::Query { .. }));
    }
}

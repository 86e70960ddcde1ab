//! In-memory store implementing every repository port.
//!
//! Used when no database URL is configured and by integration tests. All
//! tables live behind one mutex, so each repository call observes and mutates
//! a consistent snapshot, matching the single-statement atomicity of the
//! PostgreSQL adapters.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use uuid::Uuid;

use crate::domain::ports::{
    CommentRepository, CommentRepositoryError, FollowRepository, FollowRepositoryError,
    GroupRepository, GroupRepositoryError, NewUser, PostFilter, PostRepository,
    PostRepositoryError, Repositories, StoredCredentials, UserPersistenceError, UserRepository,
};
use crate::domain::{
    Comment, CommentId, CommentText, Error, Group, GroupId, GroupSlug, ImageRef, NewComment,
    NewGroup, NewPost, Post, PostId, PostText, PostUpdate, User, UserId, Username, hash_password,
};

struct PostRow {
    id: PostId,
    text: PostText,
    created_at: DateTime<Utc>,
    author: UserId,
    group: Option<GroupId>,
    image: Option<ImageRef>,
}

struct CommentRow {
    id: CommentId,
    post_id: PostId,
    author: UserId,
    text: CommentText,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct Tables {
    users: Vec<StoredCredentials>,
    groups: Vec<Group>,
    posts: Vec<PostRow>,
    comments: Vec<CommentRow>,
    follows: BTreeSet<(Uuid, Uuid)>,
    next_group_id: i64,
    next_post_id: i64,
    next_comment_id: i64,
}

impl Tables {
    fn user(&self, id: &UserId) -> Option<&User> {
        self.users
            .iter()
            .map(|stored| &stored.user)
            .find(|user| user.id() == id)
    }

    fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.iter().find(|group| group.id() == id)
    }

    fn matches(&self, filter: &PostFilter, row: &PostRow) -> bool {
        match filter {
            PostFilter::All => true,
            PostFilter::Group(group) => row.group == Some(*group),
            PostFilter::Author(author) => row.author == *author,
            PostFilter::FollowedBy(reader) => self
                .follows
                .contains(&(*reader.as_uuid(), *row.author.as_uuid())),
        }
    }

    fn hydrate(&self, row: &PostRow) -> Option<Post> {
        let author = self.user(&row.author)?.clone();
        let group = row.group.and_then(|id| self.group(id).cloned());
        Some(Post::from_parts(
            row.id,
            row.text.clone(),
            row.created_at,
            author,
            group,
            row.image.clone(),
        ))
    }

    fn hydrate_comment(&self, row: &CommentRow) -> Option<Comment> {
        let author = self.user(&row.author)?.clone();
        Some(Comment::from_parts(
            row.id,
            row.post_id,
            author,
            row.text.clone(),
            row.created_at,
        ))
    }

    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }
}

/// Process-local store for users, groups, posts, comments and follows.
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    clock: Arc<dyn Clock>,
}

impl InMemoryStore {
    /// Create an empty store stamping rows with `clock`.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            clock,
        }
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register an account with a hashed password.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use blog_backend::outbound::memory::InMemoryStore;
    ///
    /// let store = InMemoryStore::new(Arc::new(mockable::DefaultClock));
    /// let user = store.register_user("leo", "secret").expect("registered");
    /// assert_eq!(user.username().as_str(), "leo");
    /// assert!(store.register_user("leo", "other").is_err());
    /// ```
    pub fn register_user(&self, username: &str, password: &str) -> Result<User, Error> {
        let username = Username::new(username)
            .map_err(|err| Error::invalid_request(format!("invalid username: {err}")))?;
        let password_hash = hash_password(password)?;
        self.insert_user(&NewUser {
            username,
            password_hash,
        })
        .map_err(Error::from)
    }

    /// Create a group directly.
    pub fn add_group(&self, group: NewGroup) -> Result<Group, Error> {
        self.insert_group(group).map_err(Error::from)
    }

    /// Expose this store through every repository port.
    pub fn repositories(self: &Arc<Self>) -> Repositories {
        Repositories {
            users: self.clone(),
            groups: self.clone(),
            posts: self.clone(),
            comments: self.clone(),
            follows: self.clone(),
        }
    }

    /// Number of stored posts.
    pub fn post_count(&self) -> usize {
        self.tables().posts.len()
    }

    /// Number of stored comments.
    pub fn comment_count(&self) -> usize {
        self.tables().comments.len()
    }

    /// Number of stored follow edges.
    pub fn follow_count(&self) -> usize {
        self.tables().follows.len()
    }

    fn insert_user(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut tables = self.tables();
        if tables
            .users
            .iter()
            .any(|stored| stored.user.username() == &user.username)
        {
            return Err(UserPersistenceError::query(format!(
                "username {} already taken",
                user.username
            )));
        }
        let created = User::new(UserId::random(), user.username.clone());
        tables.users.push(StoredCredentials {
            user: created.clone(),
            password_hash: user.password_hash.clone(),
        });
        Ok(created)
    }

    fn insert_group(&self, group: NewGroup) -> Result<Group, GroupRepositoryError> {
        let mut tables = self.tables();
        if tables
            .groups
            .iter()
            .any(|existing| existing.slug() == group.slug())
        {
            return Err(GroupRepositoryError::query(format!(
                "group slug {} already taken",
                group.slug()
            )));
        }
        let raw = Tables::next_id(&mut tables.next_group_id);
        let id = GroupId::new(raw).map_err(|err| GroupRepositoryError::query(err.to_string()))?;
        let created = group.into_group(id);
        tables.groups.push(created.clone());
        Ok(created)
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        self.insert_user(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.tables().user(id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .tables()
            .users
            .iter()
            .map(|stored| &stored.user)
            .find(|user| user.username() == username)
            .cloned())
    }

    async fn find_credentials(
        &self,
        username: &Username,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        Ok(self
            .tables()
            .users
            .iter()
            .find(|stored| stored.user.username() == username)
            .cloned())
    }
}

#[async_trait]
impl GroupRepository for InMemoryStore {
    async fn create(&self, group: &NewGroup) -> Result<Group, GroupRepositoryError> {
        self.insert_group(group.clone())
    }

    async fn find_by_id(&self, id: GroupId) -> Result<Option<Group>, GroupRepositoryError> {
        Ok(self.tables().group(id).cloned())
    }

    async fn find_by_slug(&self, slug: &GroupSlug) -> Result<Option<Group>, GroupRepositoryError> {
        Ok(self
            .tables()
            .groups
            .iter()
            .find(|group| group.slug() == slug)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Group>, GroupRepositoryError> {
        let mut groups = self.tables().groups.clone();
        groups.sort_by(|a, b| a.title().cmp(b.title()).then(a.id().cmp(&b.id())));
        Ok(groups)
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn count(&self, filter: &PostFilter) -> Result<u64, PostRepositoryError> {
        let tables = self.tables();
        let count = tables
            .posts
            .iter()
            .filter(|row| tables.matches(filter, row))
            .count();
        Ok(count as u64)
    }

    async fn list(
        &self,
        filter: &PostFilter,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<Post>, PostRepositoryError> {
        let tables = self.tables();
        let mut rows: Vec<&PostRow> = tables
            .posts
            .iter()
            .filter(|row| tables.matches(filter, row))
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        Ok(rows
            .into_iter()
            .skip(offset)
            .take(limit as usize)
            .filter_map(|row| tables.hydrate(row))
            .collect())
    }

    async fn find_by_id(&self, id: PostId) -> Result<Option<Post>, PostRepositoryError> {
        let tables = self.tables();
        Ok(tables
            .posts
            .iter()
            .find(|row| row.id == id)
            .and_then(|row| tables.hydrate(row)))
    }

    async fn create(&self, post: &NewPost) -> Result<Post, PostRepositoryError> {
        let created_at = self.clock.utc();
        let mut tables = self.tables();
        if tables.user(&post.author).is_none() {
            return Err(PostRepositoryError::query(format!(
                "author {} does not exist",
                post.author
            )));
        }
        if let Some(group) = post.group.filter(|group| tables.group(*group).is_none()) {
            return Err(PostRepositoryError::query(format!(
                "group {group} does not exist"
            )));
        }
        let raw = Tables::next_id(&mut tables.next_post_id);
        let id = PostId::new(raw).map_err(|err| PostRepositoryError::query(err.to_string()))?;
        let row = PostRow {
            id,
            text: post.text.clone(),
            created_at,
            author: post.author,
            group: post.group,
            image: post.image.clone(),
        };
        let created = tables
            .hydrate(&row)
            .ok_or_else(|| PostRepositoryError::query("post author vanished"))?;
        tables.posts.push(row);
        Ok(created)
    }

    async fn update(
        &self,
        id: PostId,
        update: &PostUpdate,
    ) -> Result<Option<Post>, PostRepositoryError> {
        let mut tables = self.tables();
        let Some(row) = tables.posts.iter_mut().find(|row| row.id == id) else {
            return Ok(None);
        };
        row.text = update.text.clone();
        row.group = update.group;
        row.image = update.image.clone();
        let tables = &*tables;
        Ok(tables
            .posts
            .iter()
            .find(|row| row.id == id)
            .and_then(|row| tables.hydrate(row)))
    }
}

#[async_trait]
impl CommentRepository for InMemoryStore {
    async fn list_for_post(&self, post_id: PostId) -> Result<Vec<Comment>, CommentRepositoryError> {
        let tables = self.tables();
        let mut rows: Vec<&CommentRow> = tables
            .comments
            .iter()
            .filter(|row| row.post_id == post_id)
            .collect();
        rows.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.get().cmp(&b.id.get())));
        Ok(rows
            .into_iter()
            .filter_map(|row| tables.hydrate_comment(row))
            .collect())
    }

    async fn create(&self, comment: &NewComment) -> Result<Comment, CommentRepositoryError> {
        let created_at = self.clock.utc();
        let mut tables = self.tables();
        if !tables.posts.iter().any(|row| row.id == comment.post_id) {
            return Err(CommentRepositoryError::query(format!(
                "post {} does not exist",
                comment.post_id
            )));
        }
        let raw = Tables::next_id(&mut tables.next_comment_id);
        let id =
            CommentId::new(raw).map_err(|err| CommentRepositoryError::query(err.to_string()))?;
        let row = CommentRow {
            id,
            post_id: comment.post_id,
            author: comment.author,
            text: comment.text.clone(),
            created_at,
        };
        let created = tables
            .hydrate_comment(&row)
            .ok_or_else(|| CommentRepositoryError::query("comment author does not exist"))?;
        tables.comments.push(row);
        Ok(created)
    }
}

#[async_trait]
impl FollowRepository for InMemoryStore {
    async fn exists(&self, user: &UserId, author: &UserId) -> Result<bool, FollowRepositoryError> {
        Ok(self
            .tables()
            .follows
            .contains(&(*user.as_uuid(), *author.as_uuid())))
    }

    async fn insert_if_absent(
        &self,
        user: &UserId,
        author: &UserId,
    ) -> Result<bool, FollowRepositoryError> {
        if user == author {
            return Err(FollowRepositoryError::query("users cannot follow themselves"));
        }
        Ok(self
            .tables()
            .follows
            .insert((*user.as_uuid(), *author.as_uuid())))
    }

    async fn delete(&self, user: &UserId, author: &UserId) -> Result<bool, FollowRepositoryError> {
        Ok(self
            .tables()
            .follows
            .remove(&(*user.as_uuid(), *author.as_uuid())))
    }
}

//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, the page cache) are implemented by outbound
//! adapters. Driving ports (feeds, writers, follows, login) are what inbound
//! adapters call.

mod macros;
pub(crate) use macros::{define_port_error, define_repository_error};

mod cache_key;
mod comment_repository;
mod feed_query;
mod follow_command;
mod follow_repository;
mod group_repository;
mod login_service;
mod page_cache;
mod post_repository;
mod post_writer;
mod repositories;
mod user_repository;

pub use cache_key::{PageCacheKey, PageCacheKeyValidationError};
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{CommentRepository, CommentRepositoryError};
#[cfg(test)]
pub use feed_query::MockFeedQuery;
pub use feed_query::{AuthorFeed, FeedPage, FeedQuery, GroupFeed, PostDetail};
pub use follow_command::FollowCommand;
#[cfg(test)]
pub use follow_command::MockFollowCommand;
#[cfg(test)]
pub use follow_repository::MockFollowRepository;
pub use follow_repository::{FollowRepository, FollowRepositoryError};
#[cfg(test)]
pub use group_repository::MockGroupRepository;
pub use group_repository::{GroupRepository, GroupRepositoryError};
pub use login_service::LoginService;
#[cfg(test)]
pub use login_service::MockLoginService;
#[cfg(test)]
pub use page_cache::MockPageCache;
pub use page_cache::{PageCache, PageCacheError};
#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{PostFilter, PostRepository, PostRepositoryError};
#[cfg(test)]
pub use post_writer::MockPostWriter;
pub use post_writer::{PostForm, PostWriter};
pub use repositories::Repositories;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{NewUser, StoredCredentials, UserPersistenceError, UserRepository};

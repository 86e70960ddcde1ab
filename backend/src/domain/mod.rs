//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed domain entities used by the HTTP and
//! persistence layers, and the services that implement the driving ports.
//! Types validate on construction and stay immutable afterwards.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - Post, Group, Comment, User: the stored aggregates.
//! - FeedService, PostService, FollowService, PasswordLoginService: driving
//!   port implementations.
//! - IndexPageCache: short-lived cache of rendered index pages.

pub mod auth;
pub mod authorization;
pub mod comment;
pub mod error;
pub mod feed_service;
#[cfg(test)]
pub(crate) mod fixtures;
pub mod follow;
pub mod follow_service;
pub mod group;
pub mod index_cache;
pub mod password_login;
pub mod ports;
pub mod post;
pub mod post_service;
mod slug;
pub mod submission;
pub mod trace_id;
pub mod user;

pub use self::auth::{LoginCredentials, LoginValidationError, hash_password, verify_password};
pub use self::authorization::{Authorization, authorize_post_edit};
pub use self::comment::{
    Comment, CommentId, CommentText, CommentValidationError, NewComment,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::feed_service::FeedService;
pub use self::follow::{FollowOutcome, UnfollowOutcome};
pub use self::follow_service::FollowService;
pub use self::group::{Group, GroupId, GroupSlug, GroupValidationError, NewGroup};
pub use self::index_cache::{DEFAULT_INDEX_TTL, IndexPageCache, RenderedPage};
pub use self::password_login::PasswordLoginService;
pub use self::post::{
    ImageRef, NewPost, Post, PostId, PostText, PostUpdate, PostValidationError,
};
pub use self::post_service::PostService;
pub use self::submission::{
    CommentSubmission, FieldErrors, PostSubmission, ValidCommentSubmission, ValidPostSubmission,
};
pub use self::trace_id::TraceId;
pub use self::user::{User, UserId, UserValidationError, Username};

/// Posts shown on every feed page.
pub const POSTS_PER_PAGE: u32 = 10;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use blog_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;

//! Edit permission rules for posts.

use super::{Error, Post, UserId};

/// Outcome of an authorisation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Authorization {
    /// The actor may proceed.
    Allowed,
    /// The actor is known but not permitted.
    Forbidden,
    /// Nobody is logged in.
    AuthenticationRequired,
}

impl Authorization {
    /// Convert into a result, mapping refusals onto domain errors.
    pub fn into_result(self) -> Result<(), Error> {
        match self {
            Self::Allowed => Ok(()),
            Self::Forbidden => Err(Error::forbidden("only the author may edit this post")),
            Self::AuthenticationRequired => Err(Error::unauthorized("login required")),
        }
    }
}

/// Decide whether `actor` may edit `post`. Only the author may.
///
/// # Examples
/// ```
/// use blog_backend::domain::{Authorization, authorize_post_edit};
/// # use blog_backend::domain::{Post, PostId, PostText, User, UserId, Username};
/// # let author = User::new(UserId::random(), Username::new("leo").expect("name"));
/// # let post = Post::from_parts(
/// #     PostId::new(1).expect("id"),
/// #     PostText::new("text").expect("text"),
/// #     chrono::Utc::now(),
/// #     author.clone(),
/// #     None,
/// #     None,
/// # );
/// assert_eq!(authorize_post_edit(None, &post), Authorization::AuthenticationRequired);
/// assert_eq!(authorize_post_edit(Some(author.id()), &post), Authorization::Allowed);
/// ```
pub fn authorize_post_edit(actor: Option<&UserId>, post: &Post) -> Authorization {
    match actor {
        None => Authorization::AuthenticationRequired,
        Some(actor) if actor == post.author().id() => Authorization::Allowed,
        Some(_) => Authorization::Forbidden,
    }
}

//! Posts: the unit of publication.
//!
//! A post's author and creation time are fixed when it is stored; its text,
//! group and image may later be changed by the author.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::{Group, GroupId, User, UserId};

/// Number of characters a post displays as.
pub const POST_DISPLAY_CHARS: usize = 15;
/// Longest accepted image reference, in bytes.
pub const IMAGE_REF_MAX_LEN: usize = 255;
/// File extensions accepted for image references.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["gif", "jpg", "jpeg", "png", "webp"];

/// Validation errors for post values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostValidationError {
    /// Identifiers are positive.
    #[error("post id must be positive")]
    InvalidId,
    /// Text was blank once trimmed.
    #[error("this field is required")]
    EmptyText,
    /// The image reference contains whitespace or is too long.
    #[error("image reference must be a path or URL without whitespace, at most {max} bytes")]
    MalformedImage {
        /// Maximum accepted length.
        max: usize,
    },
    /// The image reference does not name a supported image file.
    #[error("upload a valid image; supported extensions are gif, jpg, jpeg, png, webp")]
    UnsupportedImage,
}

/// Database identifier of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(transparent)]
pub struct PostId(i64);

impl PostId {
    /// Validate and wrap a raw identifier.
    pub fn new(value: i64) -> Result<Self, PostValidationError> {
        if value <= 0 {
            return Err(PostValidationError::InvalidId);
        }
        Ok(Self(value))
    }

    /// Raw identifier.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trim `raw`, returning `None` when nothing remains.
pub(crate) fn required_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

/// Non-empty post body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String)]
pub struct PostText(String);

impl PostText {
    /// Validate and construct post text. Surrounding whitespace is trimmed.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, PostValidationError> {
        required_text(raw.as_ref())
            .map(Self)
            .ok_or(PostValidationError::EmptyText)
    }

    /// Borrow the text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Reference to an image held by the media store.
///
/// ## Invariants
/// - No whitespace, at most [`IMAGE_REF_MAX_LEN`] bytes.
/// - The final path segment ends in one of [`IMAGE_EXTENSIONS`].
///
/// # Examples
/// ```
/// use blog_backend::domain::ImageRef;
///
/// assert!(ImageRef::new("posts/cat.JPG").is_ok());
/// assert!(ImageRef::new("posts/cat.txt").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "posts/cat.jpg")]
pub struct ImageRef(String);

impl ImageRef {
    /// Validate and construct an image reference.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, PostValidationError> {
        let raw = raw.as_ref().trim();
        if raw.is_empty()
            || raw.len() > IMAGE_REF_MAX_LEN
            || raw.chars().any(char::is_whitespace)
        {
            return Err(PostValidationError::MalformedImage {
                max: IMAGE_REF_MAX_LEN,
            });
        }
        let path = raw.split(['?', '#']).next().unwrap_or(raw);
        let supported = path
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()));
        if !supported {
            return Err(PostValidationError::UnsupportedImage);
        }
        Ok(Self(raw.to_owned()))
    }

    /// Borrow the reference.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// A stored post with its author and group resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    id: PostId,
    text: PostText,
    created_at: DateTime<Utc>,
    author: User,
    group: Option<Group>,
    image: Option<ImageRef>,
}

impl Post {
    /// Rehydrate a post loaded from storage.
    pub fn from_parts(
        id: PostId,
        text: PostText,
        created_at: DateTime<Utc>,
        author: User,
        group: Option<Group>,
        image: Option<ImageRef>,
    ) -> Self {
        Self {
            id,
            text,
            created_at,
            author,
            group,
            image,
        }
    }

    /// Identifier.
    pub fn id(&self) -> PostId {
        self.id
    }

    /// Body text.
    pub fn text(&self) -> &PostText {
        &self.text
    }

    /// Publication time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Author.
    pub fn author(&self) -> &User {
        &self.author
    }

    /// Group the post is filed under.
    pub fn group(&self) -> Option<&Group> {
        self.group.as_ref()
    }

    /// Attached image.
    pub fn image(&self) -> Option<&ImageRef> {
        self.image.as_ref()
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head: String = self.text.as_str().chars().take(POST_DISPLAY_CHARS).collect();
        f.write_str(&head)
    }
}

/// Input for storing a new post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPost {
    /// Author; always the submitting user.
    pub author: UserId,
    /// Body text.
    pub text: PostText,
    /// Optional group.
    pub group: Option<GroupId>,
    /// Optional image.
    pub image: Option<ImageRef>,
}

/// Replacement values for the mutable fields of a post.
///
/// Every field is written as given; absent values clear the column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostUpdate {
    /// Body text.
    pub text: PostText,
    /// Group, or `None` to unfile the post.
    pub group: Option<GroupId>,
    /// Image, or `None` to drop it.
    pub image: Option<ImageRef>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Username;
    use rstest::rstest;

    #[rstest]
    #[case("  hello  ", Ok("hello"))]
    #[case(" \n\t", Err(PostValidationError::EmptyText))]
    fn text_is_trimmed_and_required(
        #[case] raw: &str,
        #[case] expected: Result<&str, PostValidationError>,
    ) {
        let result = PostText::new(raw);
        assert_eq!(result.as_ref().map(PostText::as_str), expected.as_ref().map(|s| *s));
    }

    #[rstest]
    #[case("cat.gif")]
    #[case("posts/cat.jpeg")]
    #[case("https://cdn.example.org/p/cat.WebP?size=2")]
    fn accepts_image_references(#[case] raw: &str) {
        assert_eq!(ImageRef::new(raw).expect("valid image").as_str(), raw);
    }

    #[rstest]
    #[case("", PostValidationError::MalformedImage { max: IMAGE_REF_MAX_LEN })]
    #[case("my cat.png", PostValidationError::MalformedImage { max: IMAGE_REF_MAX_LEN })]
    #[case("notes.txt", PostValidationError::UnsupportedImage)]
    #[case("png", PostValidationError::UnsupportedImage)]
    fn rejects_bad_image_references(#[case] raw: &str, #[case] expected: PostValidationError) {
        assert_eq!(ImageRef::new(raw), Err(expected));
    }

    #[rstest]
    fn posts_display_the_first_fifteen_characters() {
        let author = User::new(UserId::random(), Username::new("leo").expect("username"));
        let post = Post::from_parts(
            PostId::new(1).expect("id"),
            PostText::new("Всё смешалось в доме Облонских").expect("text"),
            Utc::now(),
            author,
            None,
            None,
        );
        assert_eq!(post.to_string(), "Всё смешалось в");
    }
}

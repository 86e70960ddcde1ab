//! Comments attached to posts. Comments are append-only.

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use super::post::required_text;
use super::{PostId, User, UserId};

/// Validation errors for comment values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommentValidationError {
    /// Identifiers are positive.
    #[error("comment id must be positive")]
    InvalidId,
    /// Text was blank once trimmed.
    #[error("this field is required")]
    EmptyText,
}

/// Database identifier of a comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(transparent)]
pub struct CommentId(i64);

impl CommentId {
    /// Validate and wrap a raw identifier.
    pub fn new(value: i64) -> Result<Self, CommentValidationError> {
        if value <= 0 {
            return Err(CommentValidationError::InvalidId);
        }
        Ok(Self(value))
    }

    /// Raw identifier.
    pub fn get(self) -> i64 {
        self.0
    }
}

/// Non-empty comment body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String)]
pub struct CommentText(String);

impl CommentText {
    /// Validate and construct comment text. Surrounding whitespace is trimmed.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, CommentValidationError> {
        required_text(raw.as_ref())
            .map(Self)
            .ok_or(CommentValidationError::EmptyText)
    }

    /// Borrow the text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// A stored comment with its author resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    id: CommentId,
    post_id: PostId,
    author: User,
    text: CommentText,
    created_at: DateTime<Utc>,
}

impl Comment {
    /// Rehydrate a comment loaded from storage.
    pub fn from_parts(
        id: CommentId,
        post_id: PostId,
        author: User,
        text: CommentText,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            post_id,
            author,
            text,
            created_at,
        }
    }

    /// Identifier.
    pub fn id(&self) -> CommentId {
        self.id
    }

    /// Post the comment belongs to.
    pub fn post_id(&self) -> PostId {
        self.post_id
    }

    /// Author.
    pub fn author(&self) -> &User {
        &self.author
    }

    /// Body text.
    pub fn text(&self) -> &CommentText {
        &self.text
    }

    /// Publication time.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

/// Input for storing a new comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewComment {
    /// Post being commented on.
    pub post_id: PostId,
    /// Author; always the submitting user.
    pub author: UserId,
    /// Body text.
    pub text: CommentText,
}

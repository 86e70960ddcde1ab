//! Thematic groups that posts may be filed under.
//!
//! Groups are created administratively; readers address them by slug.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;

use super::slug::is_valid_slug;

/// Longest accepted slug, in bytes.
pub const GROUP_SLUG_MAX_LEN: usize = 50;
/// Longest accepted title, in characters.
pub const GROUP_TITLE_MAX_CHARS: usize = 200;

/// Validation errors for group values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GroupValidationError {
    /// Identifiers are positive.
    #[error("group id must be positive")]
    InvalidId,
    /// The slug is empty, too long or uses characters outside `[a-z0-9_-]`.
    #[error("group slug must be 1-{max} lowercase letters, digits, hyphens or underscores")]
    InvalidSlug {
        /// Maximum accepted length.
        max: usize,
    },
    /// The title was blank.
    #[error("group title must not be empty")]
    EmptyTitle,
    /// The title exceeds [`GROUP_TITLE_MAX_CHARS`].
    #[error("group title must be at most {max} characters")]
    TitleTooLong {
        /// Maximum accepted length.
        max: usize,
    },
}

/// Database identifier of a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, ToSchema)]
#[serde(transparent)]
pub struct GroupId(i64);

impl GroupId {
    /// Validate and wrap a raw identifier.
    pub fn new(value: i64) -> Result<Self, GroupValidationError> {
        if value <= 0 {
            return Err(GroupValidationError::InvalidId);
        }
        Ok(Self(value))
    }

    /// Raw identifier.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// URL handle of a group.
///
/// # Examples
/// ```
/// use blog_backend::domain::GroupSlug;
///
/// assert!(GroupSlug::new("cats").is_ok());
/// assert!(GroupSlug::new("Cats!").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "cats")]
pub struct GroupSlug(String);

impl GroupSlug {
    /// Validate and construct a slug.
    pub fn new(raw: impl Into<String>) -> Result<Self, GroupValidationError> {
        let raw = raw.into();
        if !is_valid_slug(&raw, GROUP_SLUG_MAX_LEN) {
            return Err(GroupValidationError::InvalidSlug {
                max: GROUP_SLUG_MAX_LEN,
            });
        }
        Ok(Self(raw))
    }

    /// Borrow the slug.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for GroupSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated input for creating a group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGroup {
    title: String,
    slug: GroupSlug,
    description: String,
}

impl NewGroup {
    /// Validate the title and bundle the parts.
    pub fn new(
        title: impl AsRef<str>,
        slug: GroupSlug,
        description: impl Into<String>,
    ) -> Result<Self, GroupValidationError> {
        let title = title.as_ref().trim();
        if title.is_empty() {
            return Err(GroupValidationError::EmptyTitle);
        }
        if title.chars().count() > GROUP_TITLE_MAX_CHARS {
            return Err(GroupValidationError::TitleTooLong {
                max: GROUP_TITLE_MAX_CHARS,
            });
        }
        Ok(Self {
            title: title.to_owned(),
            slug,
            description: description.into(),
        })
    }

    /// Display title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// URL handle.
    pub fn slug(&self) -> &GroupSlug {
        &self.slug
    }

    /// Free-form description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Attach the identifier assigned by the store.
    pub fn into_group(self, id: GroupId) -> Group {
        Group {
            id,
            title: self.title,
            slug: self.slug,
            description: self.description,
        }
    }
}

/// A stored group. Displays as its title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    id: GroupId,
    title: String,
    slug: GroupSlug,
    description: String,
}

impl Group {
    /// Rehydrate a group loaded from storage.
    pub fn from_parts(id: GroupId, title: String, slug: GroupSlug, description: String) -> Self {
        Self {
            id,
            title,
            slug,
            description,
        }
    }

    /// Identifier.
    pub fn id(&self) -> GroupId {
        self.id
    }

    /// Display title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// URL handle.
    pub fn slug(&self) -> &GroupSlug {
        &self.slug
    }

    /// Free-form description.
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl fmt::Display for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0)]
    #[case(-4)]
    fn ids_must_be_positive(#[case] raw: i64) {
        assert_eq!(GroupId::new(raw), Err(GroupValidationError::InvalidId));
    }

    #[rstest]
    fn overlong_slugs_are_rejected() {
        let raw = "a".repeat(GROUP_SLUG_MAX_LEN + 1);
        assert!(GroupSlug::new(raw).is_err());
    }

    #[rstest]
    #[case("  ".to_owned(), GroupValidationError::EmptyTitle)]
    #[case("t".repeat(GROUP_TITLE_MAX_CHARS + 1), GroupValidationError::TitleTooLong { max: GROUP_TITLE_MAX_CHARS })]
    fn invalid_titles_are_rejected(#[case] title: String, #[case] expected: GroupValidationError) {
        let slug = GroupSlug::new("cats").expect("slug");
        assert_eq!(NewGroup::new(title, slug, ""), Err(expected));
    }

    #[rstest]
    fn groups_display_their_title() {
        let slug = GroupSlug::new("cats").expect("slug");
        let group = NewGroup::new(" Cats ", slug, "All about cats")
            .expect("new group")
            .into_group(GroupId::new(3).expect("id"));
        assert_eq!(group.to_string(), "Cats");
        assert_eq!(group.id().get(), 3);
    }
}

//! User identity as seen by posts, comments and follows.
//!
//! Credentials never leave the persistence layer except through
//! [`StoredCredentials`](crate::domain::ports::StoredCredentials), which the
//! login service consumes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Longest accepted username, in characters.
pub const USERNAME_MAX_CHARS: usize = 150;

/// Validation errors for user identity values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The id was blank.
    #[error("user id must not be empty")]
    EmptyId,
    /// The id is not a UUID.
    #[error("user id must be a valid UUID")]
    InvalidId,
    /// The username was blank once trimmed.
    #[error("username must not be empty")]
    EmptyUsername,
    /// The username exceeds [`USERNAME_MAX_CHARS`].
    #[error("username must be at most {max} characters")]
    UsernameTooLong {
        /// Maximum accepted length.
        max: usize,
    },
    /// The username contains characters outside the allowed set.
    #[error("username may only contain letters, digits, spaces and @ . + - _")]
    UsernameInvalidCharacters,
}

/// Stable user identifier stored as a UUID.
///
/// # Examples
/// ```
/// use blog_backend::domain::UserId;
///
/// let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("valid id");
/// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse an identifier from its hyphenated string form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(UserValidationError::InvalidId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserValidationError::InvalidId)
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = UserValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Unique public handle of a user.
///
/// ## Invariants
/// - Trimmed and non-empty.
/// - At most [`USERNAME_MAX_CHARS`] characters.
/// - Only letters, digits, spaces and `@ . + - _`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "leo")]
pub struct Username(String);

impl Username {
    /// Validate and construct a username. Surrounding whitespace is trimmed.
    ///
    /// # Examples
    /// ```
    /// use blog_backend::domain::Username;
    ///
    /// assert_eq!(Username::new("  leo ").expect("valid").as_str(), "leo");
    /// assert!(Username::new("a/b").is_err());
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if trimmed.chars().count() > USERNAME_MAX_CHARS {
            return Err(UserValidationError::UsernameTooLong {
                max: USERNAME_MAX_CHARS,
            });
        }
        if !trimmed.chars().all(is_username_char) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the username.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

fn is_username_char(ch: char) -> bool {
    ch.is_alphanumeric() || matches!(ch, ' ' | '@' | '.' | '+' | '-' | '_')
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Username {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Public view of a user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    username: Username,
}

impl User {
    /// Build a user from validated parts.
    pub fn new(id: UserId, username: Username) -> Self {
        Self { id, username }
    }

    /// Stable identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Public handle.
    pub fn username(&self) -> &Username {
        &self.username
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyId)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
    #[case("not-a-uuid", UserValidationError::InvalidId)]
    fn rejects_malformed_ids(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(UserId::new(raw), Err(expected));
    }

    #[rstest]
    #[case("leo")]
    #[case("Лев Толстой")]
    #[case("first.last+tag@example-host_1")]
    fn accepts_usernames_in_the_allowed_alphabet(#[case] raw: &str) {
        assert_eq!(Username::new(raw).expect("valid username").as_str(), raw);
    }

    #[rstest]
    #[case("   ", UserValidationError::EmptyUsername)]
    #[case("slash/name", UserValidationError::UsernameInvalidCharacters)]
    #[case("query?name", UserValidationError::UsernameInvalidCharacters)]
    fn rejects_invalid_usernames(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(Username::new(raw), Err(expected));
    }

    #[rstest]
    fn rejects_overlong_usernames() {
        let raw = "a".repeat(USERNAME_MAX_CHARS + 1);
        assert_eq!(
            Username::new(raw),
            Err(UserValidationError::UsernameTooLong {
                max: USERNAME_MAX_CHARS
            })
        );
    }

    #[rstest]
    fn user_serialises_id_and_username() {
        let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("id");
        let user = User::new(id, Username::new("leo").expect("username"));
        let value = serde_json::to_value(&user).expect("serialise");
        assert_eq!(value["id"], "3fa85f64-5717-4562-b3fc-2c963f66afa6");
        assert_eq!(value["username"], "leo");
    }
}

//! Validation of submitted post and comment forms.
//!
//! Raw form values are checked field by field so every problem is reported
//! at once, keyed by the form field that caused it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{CommentText, Error, GroupId, ImageRef, PostText};

/// Messages keyed by form field name.
///
/// # Examples
/// ```
/// use blog_backend::domain::FieldErrors;
///
/// let mut errors = FieldErrors::default();
/// errors.add("text", "this field is required");
/// assert_eq!(errors.messages("text"), ["this field is required"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Record `message` against `field`.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Messages recorded for `field`.
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// Whether no field failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names of the fields that failed, in sorted order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Convert into an [`Error`] carrying the messages under `details.fields`.
    pub fn into_error(self) -> Error {
        Error::invalid_request("submitted form is invalid").with_details(json!({
            "fields": self.0,
        }))
    }
}

impl From<FieldErrors> for Error {
    fn from(value: FieldErrors) -> Self {
        value.into_error()
    }
}

/// Raw post form as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PostSubmission {
    /// Body text.
    pub text: String,
    /// Group id; blank means no group.
    pub group: Option<String>,
    /// Image reference; blank means no image.
    pub image: Option<String>,
}

/// Post form after field validation. The group still needs an existence check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPostSubmission {
    /// Body text.
    pub text: PostText,
    /// Requested group.
    pub group: Option<GroupId>,
    /// Requested image.
    pub image: Option<ImageRef>,
}

fn non_blank(value: Option<&String>) -> Option<&str> {
    value.map(|raw| raw.trim()).filter(|raw| !raw.is_empty())
}

impl PostSubmission {
    /// Convenience constructor.
    pub fn new(text: impl Into<String>, group: Option<GroupId>, image: Option<&str>) -> Self {
        Self {
            text: text.into(),
            group: group.map(|id| id.to_string()),
            image: image.map(str::to_owned),
        }
    }

    /// Validate each field, collecting every failure.
    pub fn validate(&self) -> Result<ValidPostSubmission, FieldErrors> {
        let mut errors = FieldErrors::default();

        let text = PostText::new(&self.text)
            .map_err(|err| errors.add("text", err.to_string()))
            .ok();

        let group = match non_blank(self.group.as_ref()) {
            None => None,
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .and_then(|value| GroupId::new(value).ok())
                .or_else(|| {
                    errors.add("group", "select a valid choice");
                    None
                }),
        };

        let image = match non_blank(self.image.as_ref()) {
            None => None,
            Some(raw) => ImageRef::new(raw)
                .map_err(|err| errors.add("image", err.to_string()))
                .ok(),
        };

        match text {
            Some(text) if errors.is_empty() => Ok(ValidPostSubmission { text, group, image }),
            _ => Err(errors),
        }
    }
}

/// Raw comment form as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CommentSubmission {
    /// Body text.
    pub text: String,
}

/// Comment form after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCommentSubmission {
    /// Body text.
    pub text: CommentText,
}

impl CommentSubmission {
    /// Convenience constructor.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Validate the comment text.
    pub fn validate(&self) -> Result<ValidCommentSubmission, FieldErrors> {
        CommentText::new(&self.text)
            .map(|text| ValidCommentSubmission { text })
            .map_err(|err| {
                let mut errors = FieldErrors::default();
                errors.add("text", err.to_string());
                errors
            })
    }
}

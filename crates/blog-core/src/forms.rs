//! Post form: the two user-editable fields of a [`Post`] and their validation.
//!
//! Only `title` and `text` ever come from submitted input. Authorship and
//! timestamps are set by the caller after a successful validation.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Post, TITLE_MAX_CHARS};

const REQUIRED_MESSAGE: &str = "This field is required.";
const NULL_CHARACTER_MESSAGE: &str = "Null characters are not allowed.";

/// Raw submitted values, exactly as they arrived.
///
/// Missing keys deserialize to empty strings so they fail the required check
/// instead of rejecting the whole request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostInput {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
}

impl PostInput {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
        }
    }
}

/// Cleaned values of a form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPost {
    pub title: String,
    pub text: String,
}

impl ValidPost {
    /// Build a fresh, unpublished post. Author and publication are left to
    /// the caller's explicit values.
    pub fn into_post(self, author_id: Uuid, now: DateTime<Utc>) -> Post {
        Post::new(author_id, self.title, self.text, now)
    }

    /// Overwrite the editable fields of an existing post.
    pub fn apply_to(self, post: &mut Post) {
        post.title = self.title;
        post.text = self.text;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PostField {
    Title,
    Text,
}

impl PostField {
    pub fn name(self) -> &'static str {
        match self {
            PostField::Title => "title",
            PostField::Text => "text",
        }
    }
}

/// Field-level validation messages, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<PostField, Vec<String>>,
}

impl FieldErrors {
    pub fn add(&mut self, field: PostField, message: impl Into<String>) {
        self.errors.entry(field).or_default().push(message.into());
    }

    pub fn get(&self, field: PostField) -> &[String] {
        self.errors.get(&field).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (PostField, &str)> {
        self.errors
            .iter()
            .flat_map(|(field, messages)| messages.iter().map(move |m| (*field, m.as_str())))
    }
}

/// Validate submitted input.
///
/// Both fields are trimmed first. `title` must be non-empty and at most
/// [`TITLE_MAX_CHARS`] characters; `text` must be non-empty. Neither may
/// contain a NUL character.
pub fn validate(input: &PostInput) -> Result<ValidPost, FieldErrors> {
    let mut errors = FieldErrors::default();

    let title = input.title.trim();
    if title.is_empty() {
        errors.add(PostField::Title, REQUIRED_MESSAGE);
    } else {
        let length = title.chars().count();
        if length > TITLE_MAX_CHARS {
            errors.add(
                PostField::Title,
                format!(
                    "Ensure this value has at most {TITLE_MAX_CHARS} characters (it has {length})."
                ),
            );
        }
        if title.contains('\0') {
            errors.add(PostField::Title, NULL_CHARACTER_MESSAGE);
        }
    }

    let text = input.text.trim();
    if text.is_empty() {
        errors.add(PostField::Text, REQUIRED_MESSAGE);
    } else if text.contains('\0') {
        errors.add(PostField::Text, NULL_CHARACTER_MESSAGE);
    }

    if errors.is_empty() {
        Ok(ValidPost {
            title: title.to_owned(),
            text: text.to_owned(),
        })
    } else {
        Err(errors)
    }
}

/// A post form, either for display (unbound) or holding a submission (bound).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostForm {
    input: PostInput,
    errors: FieldErrors,
    cleaned: Option<ValidPost>,
    bound: bool,
}

impl PostForm {
    /// Blank form for creating a post.
    pub fn empty() -> Self {
        Self::unbound(PostInput::default())
    }

    /// Form pre-filled with an existing post's editable fields.
    pub fn from_post(post: &Post) -> Self {
        Self::unbound(PostInput::new(post.title.clone(), post.text.clone()))
    }

    /// Form bound to submitted input. Validation runs immediately.
    pub fn bind(input: PostInput) -> Self {
        let (cleaned, errors) = match validate(&input) {
            Ok(valid) => (Some(valid), FieldErrors::default()),
            Err(errors) => (None, errors),
        };

        Self {
            input,
            errors,
            cleaned,
            bound: true,
        }
    }

    fn unbound(input: PostInput) -> Self {
        Self {
            input,
            errors: FieldErrors::default(),
            cleaned: None,
            bound: false,
        }
    }

    pub fn is_bound(&self) -> bool {
        self.bound
    }

    /// An unbound form is never valid.
    pub fn is_valid(&self) -> bool {
        self.cleaned.is_some()
    }

    pub fn title(&self) -> &str {
        &self.input.title
    }

    pub fn text(&self) -> &str {
        &self.input.text
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Cleaned values, present only for a valid bound form.
    pub fn cleaned(&self) -> Option<&ValidPost> {
        self.cleaned.as_ref()
    }
}

//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical owner-scoped note record and its input draft.
//! - Define the closed `Tag` enumeration used for categorization/filtering.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `user_id`, `id` and `created_at` are immutable after creation.
//! - `tags` is a set; serialized output is always an explicit array.

use serde::Serialize;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Opaque stable identifier of a note.
pub type NoteId = String;

/// Opaque identifier of the owning user.
pub type UserId = String;

/// Closed tag enumeration attached to notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tag {
    Business,
    Personal,
    Important,
}

impl Tag {
    /// All known tags in declaration order.
    pub const ALL: [Tag; 3] = [Tag::Business, Tag::Personal, Tag::Important];

    /// Storage/wire name of this tag.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Business => "BUSINESS",
            Self::Personal => "PERSONAL",
            Self::Important => "IMPORTANT",
        }
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = NoteValidationError;

    /// Parses an exact upper-case tag name.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .into_iter()
            .find(|tag| tag.as_str() == value)
            .ok_or_else(|| NoteValidationError::UnknownTag(value.to_string()))
    }
}

/// Validation failures for note input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    BlankTitle,
    BlankText,
    BlankUserId,
    UnknownTag(String),
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "title must not be blank"),
            Self::BlankText => write!(f, "text must not be blank"),
            Self::BlankUserId => write!(f, "user id must not be blank"),
            Self::UnknownTag(value) => write!(
                f,
                "unknown tag `{value}`; expected BUSINESS|PERSONAL|IMPORTANT"
            ),
        }
    }
}

impl Error for NoteValidationError {}

/// Create/update input. Title, text and tags are replaced wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub text: String,
    pub tags: BTreeSet<Tag>,
}

impl NoteDraft {
    pub fn new(
        title: impl Into<String>,
        text: impl Into<String>,
        tags: impl IntoIterator<Item = Tag>,
    ) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            tags: tags.into_iter().collect(),
        }
    }

    /// Rejects blank title or text.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.title.trim().is_empty() {
            return Err(NoteValidationError::BlankTitle);
        }
        if self.text.trim().is_empty() {
            return Err(NoteValidationError::BlankText);
        }
        Ok(())
    }
}

/// Canonical owner-scoped note record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub user_id: UserId,
    pub title: String,
    /// Unix epoch milliseconds.
    #[serde(rename = "createdDate")]
    pub created_at: i64,
    pub text: String,
    pub tags: BTreeSet<Tag>,
}

impl Note {
    /// Creates a new note for `user_id` with a generated id and current time.
    pub fn new(user_id: impl Into<UserId>, draft: NoteDraft) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), user_id, now_epoch_ms(), draft)
    }

    /// Creates a note with caller-provided identity and creation time.
    ///
    /// Used by storage read paths and tests where identity already exists.
    pub fn with_id(
        id: impl Into<NoteId>,
        user_id: impl Into<UserId>,
        created_at: i64,
        draft: NoteDraft,
    ) -> Self {
        Self {
            id: id.into(),
            user_id: user_id.into(),
            title: draft.title,
            created_at,
            text: draft.text,
            tags: draft.tags,
        }
    }

    /// Replaces mutable fields; identity, owner and creation time are kept.
    pub fn apply(&mut self, draft: NoteDraft) {
        self.title = draft.title;
        self.text = draft.text;
        self.tags = draft.tags;
    }
}

/// Rejects blank owning-user ids.
pub fn validate_user_id(user_id: &str) -> Result<(), NoteValidationError> {
    if user_id.trim().is_empty() {
        return Err(NoteValidationError::BlankUserId);
    }
    Ok(())
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}

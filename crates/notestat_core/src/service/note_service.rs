//! Note use-case service.
//!
//! # Responsibility
//! - Provide owner-scoped create/update/delete/list/text/stats APIs.
//! - Run the lookup step before every note-scoped read or mutation.
//! - Hand listing and statistics shaping to the pure `listing`/`stats`
//!   modules.
//!
//! # Invariants
//! - Existence and ownership are checked before any mutation is applied.
//! - "Not mine" and "does not exist" surface as the same `NoteNotFound`.
//! - Log events carry ids and counts only, never note text or titles.

use crate::listing::page::{assemble, ListingError, Page, PageRequest};
use crate::model::note::{validate_user_id, Note, NoteDraft, NoteId, NoteValidationError, Tag};
use crate::repo::note_repo::{NoteRepository, RepoError};
use crate::stats::word_freq::{count_words, FrequencyTable};
use log::{debug, info, warn};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Pagination input out of range.
    InvalidArgument(String),
    /// Note input failed validation.
    Validation(NoteValidationError),
    /// No note with this id is visible to the caller.
    NoteNotFound(NoteId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent note state: {details}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::NoteNotFound(id),
            other => Self::Repo(other),
        }
    }
}

impl From<NoteValidationError> for NoteServiceError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<ListingError> for NoteServiceError {
    fn from(value: ListingError) -> Self {
        match value {
            ListingError::InvalidArgument(message) => Self::InvalidArgument(message),
        }
    }
}

/// Text-only view of one note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteText {
    pub id: NoteId,
    pub user_id: String,
    pub text: String,
}

/// Word statistics envelope for one note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteStats {
    pub stats: FrequencyTable,
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one note owned by `user_id`.
    pub fn create_note(&mut self, user_id: &str, draft: NoteDraft) -> Result<Note, NoteServiceError> {
        validate_user_id(user_id)?;
        draft.validate()?;

        let note = Note::new(user_id, draft);
        self.repo.insert_note(&note)?;
        info!(
            "event=note_create module=service status=ok note_id={} tag_count={}",
            note.id,
            note.tags.len()
        );

        self.repo
            .find_one(&note.id, user_id)?
            .ok_or(NoteServiceError::InconsistentState(
                "created note not found in read-back",
            ))
    }

    /// Replaces title, text and tags of one owned note.
    pub fn update_note(
        &mut self,
        user_id: &str,
        id: &str,
        draft: NoteDraft,
    ) -> Result<Note, NoteServiceError> {
        validate_user_id(user_id)?;
        draft.validate()?;

        let mut note = self.require_note(user_id, id)?;
        note.apply(draft);
        self.repo.update_note(&note)?;
        info!(
            "event=note_update module=service status=ok note_id={} tag_count={}",
            note.id,
            note.tags.len()
        );

        self.repo
            .find_one(id, user_id)?
            .ok_or(NoteServiceError::InconsistentState(
                "updated note not found in read-back",
            ))
    }

    /// Deletes one owned note.
    pub fn delete_note(&mut self, user_id: &str, id: &str) -> Result<(), NoteServiceError> {
        validate_user_id(user_id)?;
        self.require_note(user_id, id)?;
        self.repo.delete_one(id, user_id)?;
        info!("event=note_delete module=service status=ok note_id={id}");
        Ok(())
    }

    /// Lists `user_id`'s notes newest-first, optionally filtered by `tag`.
    pub fn list_notes(
        &self,
        user_id: &str,
        page: i64,
        size: i64,
        tag: Option<Tag>,
    ) -> Result<Page, NoteServiceError> {
        validate_user_id(user_id)?;
        let request = PageRequest::new(page, size)?;
        let stored = self.repo.find_page(user_id, tag, &request)?;
        let page = assemble(stored.items, request, stored.total_items)?;
        debug!(
            "event=note_list module=service status=ok page={} size={} items={} total_items={} tag={}",
            page.page,
            page.size,
            page.items.len(),
            page.total_items,
            tag.map_or("-", Tag::as_str)
        );
        Ok(page)
    }

    /// Returns the text body of one owned note.
    pub fn get_note_text(&self, user_id: &str, id: &str) -> Result<NoteText, NoteServiceError> {
        validate_user_id(user_id)?;
        let note = self.require_note(user_id, id)?;
        Ok(NoteText {
            id: note.id,
            user_id: note.user_id,
            text: note.text,
        })
    }

    /// Computes the word-frequency report of one owned note.
    pub fn get_note_stats(&self, user_id: &str, id: &str) -> Result<NoteStats, NoteServiceError> {
        validate_user_id(user_id)?;
        let note = self.require_note(user_id, id)?;
        let stats = count_words(note.text.as_str());
        debug!(
            "event=note_stats module=service status=ok note_id={} distinct_words={} total_words={}",
            note.id,
            stats.len(),
            stats.total_words()
        );
        Ok(NoteStats { stats })
    }

    /// Gives back the repository, e.g. to release a borrowed connection.
    pub fn into_inner(self) -> R {
        self.repo
    }

    fn require_note(&self, user_id: &str, id: &str) -> Result<Note, NoteServiceError> {
        match self.repo.find_one(id, user_id)? {
            Some(note) => Ok(note),
            None => {
                warn!("event=note_lookup module=service status=not_found note_id={id}");
                Err(NoteServiceError::NoteNotFound(id.to_string()))
            }
        }
    }
}

//! Core domain logic for notestat.
//! This crate is the single source of truth for note ownership, listing and
//! word statistics invariants.

pub mod db;
pub mod listing;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod stats;

pub use listing::page::{
    build_page, ListingError, NoteSummary, Page, PageRequest, DEFAULT_PAGE_SIZE,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{Note, NoteDraft, NoteId, NoteValidationError, Tag, UserId};
pub use repo::note_repo::{NoteRepository, RepoError, RepoResult, SqliteNoteRepository, StoredPage};
pub use service::note_service::{NoteService, NoteServiceError, NoteStats, NoteText};
pub use stats::word_freq::{count_words, FrequencyTable, WordCount};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

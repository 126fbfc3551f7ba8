//! Page request validation and page assembly.
//!
//! # Responsibility
//! - Reject out-of-range pagination input instead of clamping it.
//! - Project stored notes into text-free summaries.
//! - Compute `total_pages` from the storage-reported total.
//!
//! # Invariants
//! - `page >= 0` and `size >= 1` for every accepted request.
//! - `items.len() <= size` for every assembled page.
//! - `total_pages == 0` when `total_items == 0`, otherwise
//!   `ceil(total_items / size)`.

use crate::model::note::{Note, NoteId, Tag, UserId};
use serde::Serialize;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default page size applied by callers that omit one.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

pub type ListingResult<T> = Result<T, ListingError>;

/// Listing precondition failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingError {
    InvalidArgument(String),
}

impl Display for ListingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidArgument(message) => write!(f, "invalid argument: {message}"),
        }
    }
}

impl Error for ListingError {}

/// Validated zero-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    size: i64,
}

impl PageRequest {
    /// Validates `page >= 0`, `size >= 1` and that the row offset fits.
    pub fn new(page: i64, size: i64) -> ListingResult<Self> {
        if page < 0 {
            return Err(ListingError::InvalidArgument(format!(
                "page must be >= 0, got {page}"
            )));
        }
        if size < 1 {
            return Err(ListingError::InvalidArgument(format!(
                "size must be >= 1, got {size}"
            )));
        }
        if page.checked_mul(size).is_none() {
            return Err(ListingError::InvalidArgument(format!(
                "page {page} with size {size} overflows the row offset"
            )));
        }
        Ok(Self { page, size })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn size(&self) -> i64 {
        self.size
    }

    /// Row limit for the storage query.
    pub fn limit(&self) -> i64 {
        self.size
    }

    /// Number of rows to skip; checked in `new`.
    pub fn offset(&self) -> i64 {
        self.page * self.size
    }
}

/// List item projection of a note. Never carries the text body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteSummary {
    pub id: NoteId,
    pub user_id: UserId,
    pub title: String,
    #[serde(rename = "createdDate")]
    pub created_at: i64,
    pub tags: BTreeSet<Tag>,
}

impl From<Note> for NoteSummary {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            user_id: note.user_id,
            title: note.title,
            created_at: note.created_at,
            tags: note.tags,
        }
    }
}

/// One slice of a user's notes with pagination metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    /// Newest-first, as returned by storage.
    pub items: Vec<NoteSummary>,
    pub page: i64,
    pub size: i64,
    pub total_items: u64,
    pub total_pages: u64,
}

/// Assembles a page from storage rows.
///
/// Rows are expected to be already scoped, filtered and sorted. Out-of-range
/// `page`/`size` and over-full storage pages fail with `InvalidArgument`.
pub fn build_page(items: Vec<Note>, page: i64, size: i64, total_items: u64) -> ListingResult<Page> {
    let request = PageRequest::new(page, size)?;
    assemble(items, request, total_items)
}

/// Same as [`build_page`] for an already validated request.
pub fn assemble(items: Vec<Note>, request: PageRequest, total_items: u64) -> ListingResult<Page> {
    let size = request.size();
    if items.len() as u64 > size.unsigned_abs() {
        return Err(ListingError::InvalidArgument(format!(
            "storage returned {} items for page size {size}",
            items.len()
        )));
    }

    Ok(Page {
        items: items.into_iter().map(NoteSummary::from).collect(),
        page: request.page(),
        size,
        total_items,
        total_pages: total_pages(total_items, &request),
    })
}

/// `ceil(total_items / size)`, or 0 for an empty result set.
///
/// Takes a validated request so `size >= 1` always holds here.
pub fn total_pages(total_items: u64, request: &PageRequest) -> u64 {
    if total_items == 0 {
        return 0;
    }
    total_items.div_ceil(request.size().unsigned_abs())
}

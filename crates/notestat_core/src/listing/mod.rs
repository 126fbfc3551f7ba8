//! Paginated note listing.
//!
//! # Responsibility
//! - Validate pagination parameters before they reach storage.
//! - Shape one storage page into the public page contract.
//!
//! # Invariants
//! - Filtering and ordering belong to the storage layer; nothing here
//!   reorders items.
//! - Page items never carry note text.

pub mod page;

//! Domain model for owner-scoped notes.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//!
//! # Invariants
//! - Every note belongs to exactly one user.
//! - Tags come from a closed enumeration.

pub mod note;

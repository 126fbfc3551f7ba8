//! Derived note statistics.
//!
//! # Responsibility
//! - Turn raw note text into deterministic, recomputed-on-demand reports.
//!
//! # Invariants
//! - Everything here is a pure function of its input; nothing is persisted.

pub mod word_freq;

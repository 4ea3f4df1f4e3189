//! Official NAV history module.
//!
//! Append-only record of a fund's published daily NAV values, one entry
//! per trading day. The estimator only ever reads the most recent entry;
//! writes come from the out-of-scope daily NAV sync.

pub mod nav_history_model;
pub mod nav_history_traits;

pub use nav_history_model::NavHistoryEntry;
pub use nav_history_traits::NavHistoryRepositoryTrait;

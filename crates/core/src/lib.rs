//! Fundpulse Core - Domain entities, services, and traits.
//!
//! This crate contains the NAV estimation logic for Fundpulse.
//! It is database-agnostic and defines repository traits that are
//! implemented by the `storage-sqlite` crate.

pub mod cache;
pub mod constants;
pub mod errors;
pub mod estimator;
pub mod funds;
pub mod holdings;
pub mod nav_history;
pub mod providers;
pub mod sync;
pub mod utils;

// Re-export error types
pub use errors::Error;
pub use errors::Result;

//! Holdings synchronization job.
//!
//! Keeps stored disclosures current for every tracked fund. Driven by the
//! host runtime's scheduler (and exposed for manual invocation); each run
//! is a plain async call, so tests drive `sync_all` directly without any
//! timer harness.

pub mod sync_model;
pub mod sync_service;
pub mod sync_traits;


pub use sync_model::SyncOutcome;
pub use sync_service::HoldingsSyncService;
pub use sync_traits::HoldingsSyncServiceTrait;

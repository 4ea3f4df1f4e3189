//! Disclosed holdings module.
//!
//! A fund's disclosed stock positions and asset-allocation breakdown, keyed
//! by fund code and disclosure date. Rows are immutable once recorded: a new
//! disclosure produces a new set of rows, written wholesale by the sync job
//! and read-only to the estimator.

pub mod holdings_model;
pub mod holdings_service;
pub mod holdings_traits;

#[cfg(test)]
mod holdings_service_tests;

pub use holdings_model::{AssetAllocation, Holding, HoldingsSnapshot};
pub use holdings_service::HoldingsService;
pub use holdings_traits::{HoldingsRepositoryTrait, HoldingsServiceTrait};

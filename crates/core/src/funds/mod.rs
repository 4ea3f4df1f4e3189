//! Fund registry module.
//!
//! Funds themselves are CRUD entities owned outside the estimation core;
//! this module only provides the read side the estimator and sync job need:
//! resolving a fund code to a known fund and listing the tracked codes.

pub mod funds_model;
pub mod funds_traits;

pub use funds_model::Fund;
pub use funds_traits::FundRepositoryTrait;

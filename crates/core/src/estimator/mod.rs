//! Real-time NAV estimation.
//!
//! Reconstructs a fund's intraday return from its disclosed holdings and
//! current stock prices, falling back to a third-party estimate when any
//! required input is missing. The financial formula lives in a pure
//! function ([`estimator_service::compute_holdings_estimate`]) so it is
//! testable independently of the fallback wiring.

pub mod estimator_errors;
pub mod estimator_model;
pub mod estimator_service;
pub mod estimator_traits;

#[cfg(test)]
mod estimator_service_tests;

pub use estimator_errors::EstimateError;
pub use estimator_model::{CalculationMethod, EstimateResult, InsufficientInput};
pub use estimator_service::{compute_holdings_estimate, NavEstimatorService};
pub use estimator_traits::NavEstimatorTrait;

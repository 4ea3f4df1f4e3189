//! Short-TTL estimate memoization.
//!
//! Sits in front of the estimator: repeated lookups for the same fund
//! within the TTL window return the stored result, and a burst of
//! concurrent misses for one fund collapses into a single computation.

pub mod estimate_cache;


pub use estimate_cache::EstimateCache;

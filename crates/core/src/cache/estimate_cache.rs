use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Duration as ChronoDuration;
use futures::future::{BoxFuture, FutureExt, Shared};
use log::debug;

use crate::errors::{Error, Result};
use crate::estimator::{EstimateError, EstimateResult, NavEstimatorTrait};
use crate::utils::Clock;

/// Outcome shared between coalesced waiters. The error is wrapped in an
/// `Arc` because shared futures require a cloneable output.
type SharedOutcome = std::result::Result<EstimateResult, Arc<Error>>;
type InFlightFuture = Shared<BoxFuture<'static, SharedOutcome>>;

enum Slot {
    /// A completed estimate; fresh until its `computed_at` ages past the TTL.
    Ready(EstimateResult),
    /// A computation in progress. The generation ties finalization to the
    /// installing miss, so an eviction racing with completion cannot
    /// resurrect a stale result.
    InFlight {
        generation: u64,
        future: InFlightFuture,
    },
}

/// Per-fund memoization of NAV estimates with request coalescing.
///
/// Guarantees at most one in-flight computation per fund code: the first
/// caller to miss installs a shared future, and every concurrent caller for
/// the same code awaits it. Failed computations are never stored, so the
/// next request retries.
pub struct EstimateCache {
    estimator: Arc<dyn NavEstimatorTrait>,
    clock: Arc<dyn Clock>,
    ttl: ChronoDuration,
    entries: Mutex<HashMap<String, Slot>>,
    next_generation: AtomicU64,
}

impl EstimateCache {
    pub fn new(estimator: Arc<dyn NavEstimatorTrait>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        EstimateCache {
            estimator,
            clock,
            ttl: ChronoDuration::from_std(ttl).unwrap_or(ChronoDuration::zero()),
            entries: Mutex::new(HashMap::new()),
            next_generation: AtomicU64::new(0),
        }
    }

    /// Returns the fund's estimate: a stored value when one is younger than
    /// the TTL, otherwise the outcome of a (possibly already in-flight)
    /// computation.
    pub async fn get(&self, fund_code: &str) -> Result<EstimateResult> {
        let (future, generation) = {
            let mut entries = self.entries.lock().unwrap();
            match entries.get(fund_code) {
                Some(Slot::Ready(result)) if self.is_fresh(result) => {
                    return Ok(result.clone());
                }
                Some(Slot::InFlight { generation, future }) => (future.clone(), *generation),
                _ => {
                    let generation = self.next_generation.fetch_add(1, Ordering::SeqCst);
                    let estimator = Arc::clone(&self.estimator);
                    let code = fund_code.to_string();
                    let future: InFlightFuture =
                        async move { estimator.estimate(&code).await.map_err(Arc::new) }
                            .boxed()
                            .shared();
                    entries.insert(
                        fund_code.to_string(),
                        Slot::InFlight {
                            generation,
                            future: future.clone(),
                        },
                    );
                    (future, generation)
                }
            }
            // Lock released before awaiting.
        };

        let outcome = future.await;
        self.finalize(fund_code, generation, &outcome);
        outcome.map_err(|err| clone_error(&err))
    }

    /// Drops the fund's slot so the next request recomputes. Called by the
    /// holdings sync job right after replacing a fund's disclosure rows.
    pub fn evict(&self, fund_code: &str) {
        let removed = self.entries.lock().unwrap().remove(fund_code);
        if removed.is_some() {
            debug!("evicted cached estimate for {}", fund_code);
        }
    }

    /// Stores the completed outcome, unless the slot was evicted or
    /// replaced while the computation ran. Every waiter calls this; the
    /// generation check makes it idempotent.
    fn finalize(&self, fund_code: &str, generation: u64, outcome: &SharedOutcome) {
        let mut entries = self.entries.lock().unwrap();
        let current = matches!(
            entries.get(fund_code),
            Some(Slot::InFlight { generation: g, .. }) if *g == generation
        );
        if !current {
            return;
        }
        match outcome {
            Ok(result) => {
                entries.insert(fund_code.to_string(), Slot::Ready(result.clone()));
            }
            Err(_) => {
                entries.remove(fund_code);
            }
        }
    }

    fn is_fresh(&self, result: &EstimateResult) -> bool {
        self.clock.now().signed_duration_since(result.computed_at) < self.ttl
    }
}

/// Rebuilds a caller-facing error from the shared one. The estimate error
/// variants are reconstructed field-by-field so waiters still see typed
/// `UnknownFund`/`Unavailable` failures; anything else is stringified.
fn clone_error(err: &Error) -> Error {
    match err {
        Error::Estimate(EstimateError::UnknownFund(code)) => {
            EstimateError::UnknownFund(code.clone()).into()
        }
        Error::Estimate(EstimateError::Unavailable { fund_code, reason }) => {
            EstimateError::Unavailable {
                fund_code: fund_code.clone(),
                reason: reason.clone(),
            }
            .into()
        }
        other => Error::Unexpected(other.to_string()),
    }
}

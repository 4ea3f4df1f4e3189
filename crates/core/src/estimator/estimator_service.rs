use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::{debug, warn};

use super::estimator_errors::EstimateError;
use super::estimator_model::{CalculationMethod, EstimateResult, InsufficientInput};
use super::estimator_traits::NavEstimatorTrait;
use crate::errors::Result;
use crate::funds::FundRepositoryTrait;
use crate::holdings::{HoldingsRepositoryTrait, HoldingsSnapshot};
use crate::nav_history::NavHistoryRepositoryTrait;
use crate::providers::{
    with_retry, FallbackEstimatorTrait, PriceProviderTrait, StockPrice,
};
use crate::utils::Clock;

/// Computes a holdings-based estimate from already-fetched inputs.
///
/// Pure: no I/O, no clock reads beyond the passed timestamp. Returns
/// `Err(InsufficientInput)` when any required stock price is absent -
/// a partial weighted change over only the priced holdings is never
/// produced.
///
/// The formula: each holding contributes its NAV percentage times its
/// intraday price change; the weighted sum is scaled by the fund's equity
/// ratio (non-equity assets are assumed flat intraday, a documented
/// approximation) and applied multiplicatively to the previous NAV.
pub fn compute_holdings_estimate(
    fund_code: &str,
    previous_nav: f64,
    snapshot: &HoldingsSnapshot,
    prices: &HashMap<String, StockPrice>,
    computed_at: DateTime<Utc>,
) -> std::result::Result<EstimateResult, InsufficientInput> {
    if snapshot.holdings.is_empty() {
        return Err(InsufficientInput::NoHoldings);
    }

    let mut weighted_change = 0.0;
    for holding in &snapshot.holdings {
        let price = prices
            .get(&holding.stock_code)
            .ok_or_else(|| InsufficientInput::MissingPrice(holding.stock_code.clone()))?;
        weighted_change += holding.holding_percentage / 100.0 * price.change();
    }

    let stock_ratio = snapshot.allocation.stock_ratio;
    let estimated_nav = previous_nav * (1.0 + weighted_change * stock_ratio);
    let change_percent = (estimated_nav - previous_nav) / previous_nav * 100.0;

    Ok(EstimateResult {
        fund_code: fund_code.to_string(),
        previous_nav: Some(previous_nav),
        estimated_nav,
        change_percent,
        calculation_method: CalculationMethod::HoldingsBased,
        stock_ratio: Some(stock_ratio),
        holdings_count: Some(snapshot.holdings.len()),
        computed_at,
    })
}

/// Produces one `EstimateResult` per call: holdings-based when every input
/// is present, otherwise delegated to the fallback estimator.
pub struct NavEstimatorService {
    fund_repository: Arc<dyn FundRepositoryTrait>,
    nav_history_repository: Arc<dyn NavHistoryRepositoryTrait>,
    holdings_repository: Arc<dyn HoldingsRepositoryTrait>,
    price_provider: Arc<dyn PriceProviderTrait>,
    fallback_estimator: Arc<dyn FallbackEstimatorTrait>,
    clock: Arc<dyn Clock>,
}

impl NavEstimatorService {
    pub fn new(
        fund_repository: Arc<dyn FundRepositoryTrait>,
        nav_history_repository: Arc<dyn NavHistoryRepositoryTrait>,
        holdings_repository: Arc<dyn HoldingsRepositoryTrait>,
        price_provider: Arc<dyn PriceProviderTrait>,
        fallback_estimator: Arc<dyn FallbackEstimatorTrait>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        NavEstimatorService {
            fund_repository,
            nav_history_repository,
            holdings_repository,
            price_provider,
            fallback_estimator,
            clock,
        }
    }

    /// The holdings-based path: read previous NAV, read the holdings
    /// snapshot, price every referenced stock in one batch call.
    async fn try_holdings_based(
        &self,
        fund_code: &str,
        previous_nav: Option<f64>,
    ) -> Result<std::result::Result<EstimateResult, InsufficientInput>> {
        // A zero or negative stored NAV cannot anchor a relative change;
        // treat it the same as having no history at all.
        let previous_nav = match previous_nav {
            Some(nav) if nav > 0.0 => nav,
            _ => return Ok(Err(InsufficientInput::MissingNavHistory)),
        };

        let snapshot = match self.holdings_repository.latest_snapshot(fund_code)? {
            Some(snapshot) if !snapshot.holdings.is_empty() => snapshot,
            _ => return Ok(Err(InsufficientInput::NoHoldings)),
        };

        let mut stock_codes: Vec<String> = snapshot
            .holdings
            .iter()
            .map(|h| h.stock_code.clone())
            .collect();
        stock_codes.sort();
        stock_codes.dedup();

        let prices = match with_retry("price fetch", || {
            self.price_provider.get_prices(&stock_codes)
        })
        .await
        {
            Ok(prices) => prices,
            Err(err) => {
                return Ok(Err(InsufficientInput::PriceProviderFailed(
                    err.to_string(),
                )))
            }
        };

        Ok(compute_holdings_estimate(
            fund_code,
            previous_nav,
            &snapshot,
            &prices,
            self.clock.now(),
        ))
    }

    /// The fallback path: return the external provider's NAV verbatim.
    async fn fallback(
        &self,
        fund_code: &str,
        previous_nav: Option<f64>,
    ) -> Result<EstimateResult> {
        let estimate = with_retry("fallback estimate", || {
            self.fallback_estimator.estimate(fund_code)
        })
        .await
        .map_err(|err| EstimateError::Unavailable {
            fund_code: fund_code.to_string(),
            reason: err.to_string(),
        })?;

        let change_percent = match previous_nav {
            Some(prev) if prev > 0.0 => (estimate.nav - prev) / prev * 100.0,
            _ => 0.0,
        };

        Ok(EstimateResult {
            fund_code: fund_code.to_string(),
            previous_nav,
            estimated_nav: estimate.nav,
            change_percent,
            calculation_method: CalculationMethod::Fallback,
            stock_ratio: None,
            holdings_count: None,
            computed_at: self.clock.now(),
        })
    }
}

#[async_trait]
impl NavEstimatorTrait for NavEstimatorService {
    async fn estimate(&self, fund_code: &str) -> Result<EstimateResult> {
        if self.fund_repository.get_by_code(fund_code)?.is_none() {
            return Err(EstimateError::UnknownFund(fund_code.to_string()).into());
        }

        let previous_nav = self
            .nav_history_repository
            .latest(fund_code)?
            .map(|entry| entry.nav);

        match self.try_holdings_based(fund_code, previous_nav).await? {
            Ok(result) => Ok(result),
            Err(reason) => {
                debug!(
                    "holdings-based estimate for {} not possible ({}), using fallback",
                    fund_code, reason
                );
                let result = self.fallback(fund_code, previous_nav).await;
                if result.is_err() {
                    warn!("fallback estimate for {} failed as well", fund_code);
                }
                result
            }
        }
    }
}

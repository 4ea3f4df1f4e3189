use std::collections::HashMap;

use async_trait::async_trait;

use super::errors::ProviderError;
use super::models::{FallbackEstimate, StockPrice};
use crate::holdings::holdings_model::NewHoldingsSnapshot;

/// Batch price lookup.
#[async_trait]
pub trait PriceProviderTrait: Send + Sync {
    /// Fetches prices for the given stock codes in one call. Codes the
    /// provider cannot price are simply absent from the result map - the
    /// estimator interprets absence as "unavailable".
    async fn get_prices(
        &self,
        stock_codes: &[String],
    ) -> Result<HashMap<String, StockPrice>, ProviderError>;
}

/// Third-party pre-computed NAV estimate, used when the holdings-based
/// computation cannot be trusted.
#[async_trait]
pub trait FallbackEstimatorTrait: Send + Sync {
    /// Fails with `ProviderError::Unavailable` when the fund is unknown to
    /// the provider or the upstream call errors.
    async fn estimate(&self, fund_code: &str) -> Result<FallbackEstimate, ProviderError>;
}

/// External holdings disclosure source.
#[async_trait]
pub trait DisclosureSourceTrait: Send + Sync {
    /// Returns the fund's most recently disclosed holdings and allocation,
    /// or `None` for funds with no public disclosure yet.
    async fn latest_holdings(
        &self,
        fund_code: &str,
    ) -> Result<Option<NewHoldingsSnapshot>, ProviderError>;
}

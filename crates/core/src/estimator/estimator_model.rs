//! Estimation domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// How an estimate was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMethod {
    /// Computed from disclosed holdings and live stock prices.
    HoldingsBased,
    /// Taken verbatim from the external fallback estimator.
    Fallback,
}

/// A point-in-time NAV estimate. Transient: produced fresh by the
/// estimator and held briefly by the estimate cache, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateResult {
    pub fund_code: String,
    /// Most recent officially published NAV. Absent only on the fallback
    /// path when the fund has no stored history.
    pub previous_nav: Option<f64>,
    pub estimated_nav: f64,
    /// Estimated intraday change in percent, relative to the previous NAV
    /// (zero when the previous NAV is unknown).
    pub change_percent: f64,
    pub calculation_method: CalculationMethod,
    /// Equity share of the fund used in the computation. Unset on the
    /// fallback path.
    pub stock_ratio: Option<f64>,
    /// Number of holdings the computation covered. Unset on the fallback
    /// path.
    pub holdings_count: Option<usize>,
    pub computed_at: DateTime<Utc>,
}

/// Why the holdings-based path could not produce an estimate.
///
/// Every variant routes to the fallback provider; none of them is a
/// caller-visible error on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsufficientInput {
    /// No published NAV stored for the fund, or the stored value is not a
    /// usable anchor (zero or negative).
    MissingNavHistory,
    /// No disclosed holdings (or no holdings/allocation snapshot) stored.
    NoHoldings,
    /// A required stock price was absent from the provider's answer.
    /// Partial computation is never returned, to avoid silently
    /// understating risk from untracked names.
    MissingPrice(String),
    /// The price provider call itself failed or timed out.
    PriceProviderFailed(String),
}

impl fmt::Display for InsufficientInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsufficientInput::MissingNavHistory => write!(f, "no NAV history"),
            InsufficientInput::NoHoldings => write!(f, "no disclosed holdings"),
            InsufficientInput::MissingPrice(code) => {
                write!(f, "no price for stock {}", code)
            }
            InsufficientInput::PriceProviderFailed(reason) => {
                write!(f, "price provider failed: {}", reason)
            }
        }
    }
}

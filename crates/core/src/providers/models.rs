//! Provider boundary models.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A stock's last-traded price and its reference (previous-close) price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockPrice {
    pub current: f64,
    pub previous_close: f64,
}

impl StockPrice {
    /// Intraday change relative to the reference price.
    pub fn change(&self) -> f64 {
        (self.current - self.previous_close) / self.previous_close
    }
}

/// A third-party pre-computed NAV estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FallbackEstimate {
    pub nav: f64,
    pub as_of: NaiveDateTime,
}

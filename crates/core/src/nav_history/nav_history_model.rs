//! NAV history domain model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One officially published daily NAV value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavHistoryEntry {
    pub fund_code: String,
    pub date: NaiveDate,
    pub nav: f64,
    pub accumulated_nav: Option<f64>,
    /// Day-over-day growth in percent, as published.
    pub daily_growth: Option<f64>,
}

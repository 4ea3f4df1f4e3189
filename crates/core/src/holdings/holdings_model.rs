//! Holdings and asset-allocation domain models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One disclosed stock position of a fund.
///
/// `holding_percentage` is the position's share of fund NAV in percent
/// (0-100). Holdings of one fund need not sum to 100 since non-equity
/// assets exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holding {
    pub id: String,
    pub fund_code: String,
    pub stock_code: String,
    pub stock_name: String,
    pub holding_percentage: f64,
    pub disclosure_date: NaiveDate,
}

/// A fund's split across asset classes as of one disclosure date.
/// Ratios are 0-1 and sum to roughly 1 within disclosure tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetAllocation {
    pub fund_code: String,
    pub stock_ratio: f64,
    pub bond_ratio: f64,
    pub cash_ratio: f64,
    pub other_ratio: f64,
    pub disclosure_date: NaiveDate,
}

/// The paired holdings + allocation read the estimator performs.
///
/// Both sides share the same disclosure date; the repository only ever
/// returns a snapshot where that holds (both are written in a single
/// transaction by the sync job).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HoldingsSnapshot {
    pub as_of: NaiveDate,
    pub holdings: Vec<Holding>,
    pub allocation: AssetAllocation,
}

/// Input model for one stock position of a new disclosure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHolding {
    pub stock_code: String,
    pub stock_name: String,
    pub holding_percentage: f64,
}

/// Input model for the allocation side of a new disclosure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssetAllocation {
    pub stock_ratio: f64,
    pub bond_ratio: f64,
    pub cash_ratio: f64,
    pub other_ratio: f64,
}

/// A freshly disclosed holdings snapshot, as returned by the disclosure
/// source and written wholesale by the sync job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewHoldingsSnapshot {
    pub as_of: NaiveDate,
    pub holdings: Vec<NewHolding>,
    pub allocation: NewAssetAllocation,
}

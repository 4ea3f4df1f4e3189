use async_trait::async_trait;
use chrono::NaiveDate;

use super::holdings_model::{Holding, HoldingsSnapshot, NewHoldingsSnapshot};
use crate::errors::Result;

#[async_trait]
pub trait HoldingsRepositoryTrait: Send + Sync {
    /// Returns the most recent holdings + allocation pair for a fund, or
    /// `None` when the fund has no stored disclosure. A snapshot is only
    /// returned when both sides exist for the same disclosure date.
    fn latest_snapshot(&self, fund_code: &str) -> Result<Option<HoldingsSnapshot>>;

    /// Returns the stored holdings for a fund: the set disclosed on
    /// `as_of` when given, otherwise the most recent set.
    fn holdings_as_of(&self, fund_code: &str, as_of: Option<NaiveDate>) -> Result<Vec<Holding>>;

    /// Whether a snapshot for this fund and disclosure date is already
    /// stored. Used by the sync job to skip unchanged disclosures.
    fn has_snapshot(&self, fund_code: &str, as_of: NaiveDate) -> Result<bool>;

    /// Replaces (never merges) the fund's stored rows for the snapshot's
    /// disclosure date. Holdings and allocation are written in a single
    /// transaction so readers never observe a mixed pair.
    async fn replace_snapshot(&self, fund_code: &str, snapshot: NewHoldingsSnapshot) -> Result<()>;
}

#[async_trait]
pub trait HoldingsServiceTrait: Send + Sync {
    /// Read-only projection of stored holdings, most recent by default.
    /// Fails with `UnknownFund` for codes with no fund record.
    fn get_holdings(&self, fund_code: &str, as_of: Option<NaiveDate>) -> Result<Vec<Holding>>;
}

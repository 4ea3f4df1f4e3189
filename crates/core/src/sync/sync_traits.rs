use std::collections::HashMap;

use async_trait::async_trait;

use super::sync_model::SyncOutcome;
use crate::errors::Result;

#[async_trait]
pub trait HoldingsSyncServiceTrait: Send + Sync {
    /// Refreshes disclosures for every tracked fund and returns a per-fund
    /// outcome map. A single fund's failure is recorded in its outcome,
    /// never raised to the caller of the whole run.
    async fn sync_all(&self) -> Result<HashMap<String, SyncOutcome>>;

    /// Refreshes one fund. Errors are folded into the outcome.
    async fn sync_fund(&self, fund_code: &str) -> SyncOutcome;
}

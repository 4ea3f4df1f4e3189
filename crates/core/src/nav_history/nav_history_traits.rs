use async_trait::async_trait;

use super::nav_history_model::NavHistoryEntry;
use crate::errors::Result;

#[async_trait]
pub trait NavHistoryRepositoryTrait: Send + Sync {
    /// Returns the fund's most recent published NAV entry, or `None` when
    /// no history is stored. History is daily and append-only, so the most
    /// recent entry always predates the estimate time.
    fn latest(&self, fund_code: &str) -> Result<Option<NavHistoryEntry>>;

    /// Inserts or updates entries (one per fund and date). Used by the
    /// daily NAV sync and by tests to seed history.
    async fn upsert_entries(&self, entries: Vec<NavHistoryEntry>) -> Result<usize>;
}

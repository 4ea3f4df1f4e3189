use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use log::{error, info};

use super::sync_model::SyncOutcome;
use super::sync_traits::HoldingsSyncServiceTrait;
use crate::cache::EstimateCache;
use crate::constants::SYNC_CONCURRENCY;
use crate::errors::Result;
use crate::funds::FundRepositoryTrait;
use crate::holdings::HoldingsRepositoryTrait;
use crate::providers::{with_retry, DisclosureSourceTrait};

/// Refreshes stored holdings/allocation rows from the external disclosure
/// source and evicts affected estimate cache entries.
pub struct HoldingsSyncService {
    fund_repository: Arc<dyn FundRepositoryTrait>,
    holdings_repository: Arc<dyn HoldingsRepositoryTrait>,
    disclosure_source: Arc<dyn DisclosureSourceTrait>,
    estimate_cache: Arc<EstimateCache>,
}

impl HoldingsSyncService {
    pub fn new(
        fund_repository: Arc<dyn FundRepositoryTrait>,
        holdings_repository: Arc<dyn HoldingsRepositoryTrait>,
        disclosure_source: Arc<dyn DisclosureSourceTrait>,
        estimate_cache: Arc<EstimateCache>,
    ) -> Self {
        HoldingsSyncService {
            fund_repository,
            holdings_repository,
            disclosure_source,
            estimate_cache,
        }
    }

    async fn sync_fund_inner(&self, fund_code: &str) -> Result<SyncOutcome> {
        let snapshot = with_retry("holdings disclosure", || {
            self.disclosure_source.latest_holdings(fund_code)
        })
        .await?;

        let snapshot = match snapshot {
            Some(snapshot) if !snapshot.holdings.is_empty() => snapshot,
            _ => return Ok(SyncOutcome::SkippedNoDisclosure),
        };

        if self
            .holdings_repository
            .has_snapshot(fund_code, snapshot.as_of)?
        {
            return Ok(SyncOutcome::AlreadyCurrent {
                as_of: snapshot.as_of,
            });
        }

        let as_of = snapshot.as_of;
        let holdings_count = snapshot.holdings.len();

        // Holdings and allocation land in one transaction; only then is the
        // cached estimate dropped, so a reader never pairs new rows with a
        // pre-sync estimate or vice-versa.
        self.holdings_repository
            .replace_snapshot(fund_code, snapshot)
            .await?;
        self.estimate_cache.evict(fund_code);

        Ok(SyncOutcome::Updated {
            as_of,
            holdings_count,
        })
    }
}

#[async_trait]
impl HoldingsSyncServiceTrait for HoldingsSyncService {
    async fn sync_all(&self) -> Result<HashMap<String, SyncOutcome>> {
        let funds = self.fund_repository.list()?;
        info!("syncing holdings for {} funds", funds.len());

        let outcomes: HashMap<String, SyncOutcome> = stream::iter(funds)
            .map(|fund| async move {
                let outcome = self.sync_fund(&fund.code).await;
                (fund.code, outcome)
            })
            .buffer_unordered(SYNC_CONCURRENCY)
            .collect()
            .await;

        let updated = outcomes
            .values()
            .filter(|o| matches!(o, SyncOutcome::Updated { .. }))
            .count();
        info!(
            "holdings sync completed: {}/{} funds updated",
            updated,
            outcomes.len()
        );
        Ok(outcomes)
    }

    async fn sync_fund(&self, fund_code: &str) -> SyncOutcome {
        match self.sync_fund_inner(fund_code).await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!("holdings sync for {} failed: {}", fund_code, err);
                SyncOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }
}

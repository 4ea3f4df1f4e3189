use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::holdings_model::Holding;
use super::holdings_traits::{HoldingsRepositoryTrait, HoldingsServiceTrait};
use crate::errors::Result;
use crate::estimator::EstimateError;
use crate::funds::FundRepositoryTrait;

pub struct HoldingsService {
    fund_repository: Arc<dyn FundRepositoryTrait>,
    holdings_repository: Arc<dyn HoldingsRepositoryTrait>,
}

impl HoldingsService {
    pub fn new(
        fund_repository: Arc<dyn FundRepositoryTrait>,
        holdings_repository: Arc<dyn HoldingsRepositoryTrait>,
    ) -> Self {
        HoldingsService {
            fund_repository,
            holdings_repository,
        }
    }
}

#[async_trait]
impl HoldingsServiceTrait for HoldingsService {
    fn get_holdings(&self, fund_code: &str, as_of: Option<NaiveDate>) -> Result<Vec<Holding>> {
        if self.fund_repository.get_by_code(fund_code)?.is_none() {
            return Err(EstimateError::UnknownFund(fund_code.to_string()).into());
        }
        self.holdings_repository.holdings_as_of(fund_code, as_of)
    }
}

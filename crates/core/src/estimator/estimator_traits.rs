use async_trait::async_trait;

use super::estimator_model::EstimateResult;
use crate::errors::Result;

#[async_trait]
pub trait NavEstimatorTrait: Send + Sync {
    /// Produces one estimate for the fund at call time. Fails with
    /// `EstimateError::UnknownFund` for untracked codes and
    /// `EstimateError::Unavailable` when both estimation paths fail.
    async fn estimate(&self, fund_code: &str) -> Result<EstimateResult>;
}

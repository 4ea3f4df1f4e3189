use async_trait::async_trait;

use super::funds_model::Fund;
use crate::errors::Result;

#[async_trait]
pub trait FundRepositoryTrait: Send + Sync {
    /// Looks up a fund by its code. Returns `Ok(None)` when no fund with
    /// that code is tracked.
    fn get_by_code(&self, code: &str) -> Result<Option<Fund>>;

    /// Lists every tracked fund, ordered by code.
    fn list(&self) -> Result<Vec<Fund>>;
}

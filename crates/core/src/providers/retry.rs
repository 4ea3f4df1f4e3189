//! Single-retry wrapper for provider calls.

use std::future::Future;

use log::warn;

use super::errors::ProviderError;
use crate::constants::PROVIDER_RETRY_BACKOFF;

/// Runs a provider call, retrying once after a short backoff when the first
/// attempt fails with a transient error. Anything else is returned as-is;
/// there are no unbounded retry loops.
pub async fn with_retry<T, F, Fut>(op: &str, call: F) -> Result<T, ProviderError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    match call().await {
        Ok(value) => Ok(value),
        Err(err) if err.is_transient() => {
            warn!("{} failed, retrying once: {}", op, err);
            tokio::time::sleep(PROVIDER_RETRY_BACKOFF).await;
            call().await
        }
        Err(err) => Err(err),
    }
}

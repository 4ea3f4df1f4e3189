use thiserror::Error;

/// Errors crossing a provider boundary.
#[derive(Error, Debug, Clone)]
pub enum ProviderError {
    /// The provider rejected the request or the upstream call errored.
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// The call did not complete within the request timeout.
    #[error("Provider call timed out: {0}")]
    Timeout(String),

    /// The provider answered with a payload we could not interpret.
    #[error("Invalid provider response: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    /// Transient errors are retried once with a short backoff; a malformed
    /// payload will not get better on retry.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ProviderError::Unavailable(_) | ProviderError::Timeout(_)
        )
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout(err.to_string())
        } else if err.is_decode() {
            ProviderError::InvalidResponse(err.to_string())
        } else {
            ProviderError::Unavailable(err.to_string())
        }
    }
}

use thiserror::Error;

/// Caller-visible estimation failures.
///
/// Missing inputs never surface here; they route to the fallback provider
/// first. Only an unknown fund code or the failure of both estimation
/// paths is reported.
#[derive(Error, Debug)]
pub enum EstimateError {
    /// The caller referenced a fund code with no fund record. Not retried.
    #[error("Unknown fund: {0}")]
    UnknownFund(String),

    /// Both the holdings-based path and the fallback path failed. No value
    /// is fabricated in this case.
    #[error("Estimate unavailable for {fund_code}: {reason}")]
    Unavailable { fund_code: String, reason: String },
}

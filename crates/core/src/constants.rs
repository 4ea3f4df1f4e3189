use std::time::Duration;

/// Default time-to-live for cached NAV estimates.
pub const DEFAULT_ESTIMATE_TTL: Duration = Duration::from_secs(60);

/// Default interval between holdings sync runs.
pub const DEFAULT_SYNC_INTERVAL_SECS: u64 = 24 * 60 * 60;

/// Maximum number of funds synced concurrently in one sync run.
pub const SYNC_CONCURRENCY: usize = 4;

/// Backoff before the single retry of a failed provider call.
pub const PROVIDER_RETRY_BACKOFF: Duration = Duration::from_millis(250);

/// Request timeout applied to every outbound provider HTTP call.
pub const PROVIDER_REQUEST_TIMEOUT_SECS: u64 = 10;

//! Background scheduler for the periodic holdings sync.

use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::info;

use crate::main_lib::AppState;

/// Initial delay before the first sync (lets the server finish starting).
const INITIAL_DELAY_SECS: u64 = 10;

/// Starts the background holdings sync scheduler.
pub fn start_holdings_sync_scheduler(state: Arc<AppState>, sync_interval_secs: u64) {
    tokio::spawn(async move {
        info!(
            "Holdings sync scheduler started ({}s interval)",
            sync_interval_secs
        );

        tokio::time::sleep(Duration::from_secs(INITIAL_DELAY_SECS)).await;

        // First tick fires immediately, subsequent ticks are one interval apart.
        let mut sync_interval = interval(Duration::from_secs(sync_interval_secs));

        loop {
            sync_interval.tick().await;
            run_scheduled_sync(&state).await;
        }
    });
}

/// Runs a single scheduled sync. Per-fund failures are reported in the
/// outcome map; only listing the tracked funds can fail the run itself.
async fn run_scheduled_sync(state: &Arc<AppState>) {
    info!("Running scheduled holdings sync...");

    match state.sync_service.sync_all().await {
        Ok(outcomes) => {
            let failed = outcomes
                .values()
                .filter(|o| matches!(o, fundpulse_core::sync::SyncOutcome::Failed { .. }))
                .count();
            info!(
                "Scheduled holdings sync completed: {} funds, {} failed",
                outcomes.len(),
                failed
            );
        }
        Err(e) => {
            tracing::warn!("Scheduled holdings sync failed: {}", e);
        }
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::post,
    Json, Router,
};
use fundpulse_core::sync::SyncOutcome;

use crate::{error::ApiResult, main_lib::AppState};

/// Manually triggered full sync run. Same code path as the scheduler.
async fn sync_all_holdings(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<HashMap<String, SyncOutcome>>> {
    let outcomes = state.sync_service.sync_all().await?;
    Ok(Json(outcomes))
}

async fn sync_fund_holdings(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> ApiResult<Json<SyncOutcome>> {
    let outcome = state.sync_service.sync_fund(&code).await;
    Ok(Json(outcome))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sync/holdings", post(sync_all_holdings))
        .route("/sync/holdings/{code}", post(sync_fund_holdings))
}

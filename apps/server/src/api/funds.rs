use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::NaiveDate;
use fundpulse_core::errors::ValidationError;
use fundpulse_core::estimator::EstimateResult;
use fundpulse_core::funds::{Fund, FundRepositoryTrait};
use fundpulse_core::holdings::Holding;
use serde::Deserialize;

use crate::{error::ApiResult, main_lib::AppState};

async fn list_funds(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Fund>>> {
    let funds = state.fund_repository.list()?;
    Ok(Json(funds))
}

/// Real-time NAV estimate. Served from the cache; a miss triggers one
/// computation no matter how many requests arrive at once.
async fn get_realtime_nav(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
) -> ApiResult<Json<EstimateResult>> {
    let estimate = state.estimate_cache.get(&code).await?;
    Ok(Json(estimate))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HoldingsQuery {
    as_of: Option<String>,
}

async fn get_fund_holdings(
    State(state): State<Arc<AppState>>,
    Path(code): Path<String>,
    Query(q): Query<HoldingsQuery>,
) -> ApiResult<Json<Vec<Holding>>> {
    let as_of = q
        .as_of
        .map(|s| {
            NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .map_err(|e| ValidationError::InvalidInput(format!("Invalid asOf date: {}", e)))
        })
        .transpose()
        .map_err(fundpulse_core::Error::from)?;
    let holdings = state.holdings_service.get_holdings(&code, as_of)?;
    Ok(Json(holdings))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/funds", get(list_funds))
        .route("/funds/{code}/nav/realtime", get(get_realtime_nav))
        .route("/funds/{code}/holdings", get(get_fund_holdings))
}

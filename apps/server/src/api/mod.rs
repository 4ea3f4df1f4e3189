use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::main_lib::AppState;

pub mod funds;
pub mod sync;

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub fn app_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .merge(funds::router())
        .merge(sync::router());

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

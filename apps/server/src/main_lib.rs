use std::sync::Arc;
use std::time::Duration;

use crate::config::Config;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use fundpulse_core::cache::EstimateCache;
use fundpulse_core::estimator::NavEstimatorService;
use fundpulse_core::holdings::{HoldingsService, HoldingsServiceTrait};
use fundpulse_core::providers::{EastmoneyClient, TiantianClient};
use fundpulse_core::sync::{HoldingsSyncService, HoldingsSyncServiceTrait};
use fundpulse_core::utils::SystemClock;
use fundpulse_storage_sqlite::funds::FundRepository;
use fundpulse_storage_sqlite::holdings::HoldingsRepository;
use fundpulse_storage_sqlite::nav_history::NavHistoryRepository;
use fundpulse_storage_sqlite::{db, spawn_writer};

pub struct AppState {
    pub estimate_cache: Arc<EstimateCache>,
    pub holdings_service: Arc<dyn HoldingsServiceTrait + Send + Sync>,
    pub sync_service: Arc<dyn HoldingsSyncServiceTrait + Send + Sync>,
    pub fund_repository: Arc<FundRepository>,
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let pool = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", config.db_path);
    let writer = spawn_writer(pool.clone());

    let fund_repository = Arc::new(FundRepository::new(pool.clone(), writer.clone()));
    let holdings_repository = Arc::new(HoldingsRepository::new(pool.clone(), writer.clone()));
    let nav_history_repository = Arc::new(NavHistoryRepository::new(pool.clone(), writer.clone()));

    for (code, name) in &config.seed_funds {
        fund_repository.ensure_fund(code, name).await?;
        tracing::info!("Tracking fund {}", code);
    }

    let eastmoney = Arc::new(EastmoneyClient::new()?);
    let tiantian = Arc::new(TiantianClient::new()?);
    let clock = Arc::new(SystemClock);

    let estimator = Arc::new(NavEstimatorService::new(
        fund_repository.clone(),
        nav_history_repository.clone(),
        holdings_repository.clone(),
        eastmoney.clone(),
        tiantian,
        clock.clone(),
    ));

    let estimate_cache = Arc::new(EstimateCache::new(
        estimator,
        clock,
        Duration::from_secs(config.estimate_ttl_secs),
    ));

    let holdings_service: Arc<dyn HoldingsServiceTrait + Send + Sync> = Arc::new(
        HoldingsService::new(fund_repository.clone(), holdings_repository.clone()),
    );

    let sync_service: Arc<dyn HoldingsSyncServiceTrait + Send + Sync> =
        Arc::new(HoldingsSyncService::new(
            fund_repository.clone(),
            holdings_repository,
            eastmoney,
            estimate_cache.clone(),
        ));

    Ok(Arc::new(AppState {
        estimate_cache,
        holdings_service,
        sync_service,
        fund_repository,
    }))
}

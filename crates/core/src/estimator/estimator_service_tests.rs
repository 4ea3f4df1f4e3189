//! Tests for the NAV estimator: the holdings-based formula, the fallback
//! policy, and the retry-once provider discipline.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::{NaiveDate, TimeZone, Utc};

    use crate::errors::{Error, Result};
    use crate::estimator::{
        compute_holdings_estimate, CalculationMethod, EstimateError, InsufficientInput,
        NavEstimatorService, NavEstimatorTrait,
    };
    use crate::funds::{Fund, FundRepositoryTrait};
    use crate::holdings::holdings_model::NewHoldingsSnapshot;
    use crate::holdings::{
        AssetAllocation, Holding, HoldingsRepositoryTrait, HoldingsSnapshot,
    };
    use crate::nav_history::{NavHistoryEntry, NavHistoryRepositoryTrait};
    use crate::providers::{
        FallbackEstimate, FallbackEstimatorTrait, PriceProviderTrait, ProviderError, StockPrice,
    };
    use crate::utils::clock::test_support::ManualClock;

    const FUND: &str = "001186";

    // =========================================================================
    // Mocks
    // =========================================================================

    #[derive(Default)]
    struct MockFundRepository {
        codes: Vec<String>,
    }

    impl MockFundRepository {
        fn with_fund(code: &str) -> Self {
            Self {
                codes: vec![code.to_string()],
            }
        }
    }

    fn fund(code: &str) -> Fund {
        let now = Utc::now().naive_utc();
        Fund {
            id: format!("fund-{}", code),
            code: code.to_string(),
            name: format!("Fund {}", code),
            category: None,
            issuer: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[async_trait]
    impl FundRepositoryTrait for MockFundRepository {
        fn get_by_code(&self, code: &str) -> Result<Option<Fund>> {
            Ok(self
                .codes
                .iter()
                .find(|c| c.as_str() == code)
                .map(|c| fund(c)))
        }

        fn list(&self) -> Result<Vec<Fund>> {
            Ok(self.codes.iter().map(|c| fund(c)).collect())
        }
    }

    #[derive(Default)]
    struct MockNavHistoryRepository {
        latest: Option<NavHistoryEntry>,
    }

    #[async_trait]
    impl NavHistoryRepositoryTrait for MockNavHistoryRepository {
        fn latest(&self, _fund_code: &str) -> Result<Option<NavHistoryEntry>> {
            Ok(self.latest.clone())
        }

        async fn upsert_entries(&self, entries: Vec<NavHistoryEntry>) -> Result<usize> {
            Ok(entries.len())
        }
    }

    #[derive(Default)]
    struct MockHoldingsRepository {
        snapshot: Option<HoldingsSnapshot>,
    }

    #[async_trait]
    impl HoldingsRepositoryTrait for MockHoldingsRepository {
        fn latest_snapshot(&self, _fund_code: &str) -> Result<Option<HoldingsSnapshot>> {
            Ok(self.snapshot.clone())
        }

        fn holdings_as_of(
            &self,
            _fund_code: &str,
            _as_of: Option<NaiveDate>,
        ) -> Result<Vec<Holding>> {
            Ok(self
                .snapshot
                .as_ref()
                .map(|s| s.holdings.clone())
                .unwrap_or_default())
        }

        fn has_snapshot(&self, _fund_code: &str, as_of: NaiveDate) -> Result<bool> {
            Ok(self.snapshot.as_ref().is_some_and(|s| s.as_of == as_of))
        }

        async fn replace_snapshot(
            &self,
            _fund_code: &str,
            _snapshot: NewHoldingsSnapshot,
        ) -> Result<()> {
            Ok(())
        }
    }

    struct MockPriceProvider {
        prices: Mutex<HashMap<String, StockPrice>>,
        calls: AtomicUsize,
        failures_remaining: AtomicUsize,
    }

    impl MockPriceProvider {
        fn new(prices: HashMap<String, StockPrice>) -> Self {
            Self {
                prices: Mutex::new(prices),
                calls: AtomicUsize::new(0),
                failures_remaining: AtomicUsize::new(0),
            }
        }

        fn fail_next(&self, times: usize) {
            self.failures_remaining.store(times, Ordering::SeqCst);
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PriceProviderTrait for MockPriceProvider {
        async fn get_prices(
            &self,
            stock_codes: &[String],
        ) -> std::result::Result<HashMap<String, StockPrice>, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.failures_remaining.load(Ordering::SeqCst) > 0 {
                self.failures_remaining.fetch_sub(1, Ordering::SeqCst);
                return Err(ProviderError::Timeout("simulated timeout".into()));
            }
            let prices = self.prices.lock().unwrap();
            Ok(stock_codes
                .iter()
                .filter_map(|code| prices.get(code).map(|p| (code.clone(), *p)))
                .collect())
        }
    }

    struct MockFallbackEstimator {
        estimate: Option<FallbackEstimate>,
        calls: AtomicUsize,
    }

    impl MockFallbackEstimator {
        fn with_nav(nav: f64) -> Self {
            Self {
                estimate: Some(FallbackEstimate {
                    nav,
                    as_of: Utc::now().naive_utc(),
                }),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                estimate: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl FallbackEstimatorTrait for MockFallbackEstimator {
        async fn estimate(
            &self,
            fund_code: &str,
        ) -> std::result::Result<FallbackEstimate, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.estimate
                .clone()
                .ok_or_else(|| ProviderError::Unavailable(format!("{} unknown upstream", fund_code)))
        }
    }

    // =========================================================================
    // Fixtures
    // =========================================================================

    fn nav_entry(nav: f64) -> NavHistoryEntry {
        NavHistoryEntry {
            fund_code: FUND.to_string(),
            date: NaiveDate::from_ymd_opt(2024, 1, 30).unwrap(),
            nav,
            accumulated_nav: None,
            daily_growth: None,
        }
    }

    /// Ten equal-weight positions whose changes combine to the given
    /// equity-weighted change.
    fn ten_position_snapshot(stock_ratio: f64, combined_change: f64) -> HoldingsSnapshot {
        let as_of = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        let holdings = (0..10)
            .map(|i| Holding {
                id: format!("h{}", i),
                fund_code: FUND.to_string(),
                stock_code: format!("60{:04}", i),
                stock_name: format!("Stock {}", i),
                holding_percentage: 10.0,
                disclosure_date: as_of,
            })
            .collect();
        HoldingsSnapshot {
            as_of,
            holdings,
            allocation: AssetAllocation {
                fund_code: FUND.to_string(),
                stock_ratio,
                bond_ratio: 1.0 - stock_ratio,
                cash_ratio: 0.0,
                other_ratio: 0.0,
                disclosure_date: as_of,
            },
        }
    }

    /// Prices where every stock moved by `combined_change` relative to a
    /// 10.0 previous close, so ten 10% positions sum to exactly
    /// `combined_change`.
    fn uniform_prices(snapshot: &HoldingsSnapshot, combined_change: f64) -> HashMap<String, StockPrice> {
        snapshot
            .holdings
            .iter()
            .map(|h| {
                (
                    h.stock_code.clone(),
                    StockPrice {
                        current: 10.0 * (1.0 + combined_change),
                        previous_close: 10.0,
                    },
                )
            })
            .collect()
    }

    fn service(
        nav: Option<f64>,
        snapshot: Option<HoldingsSnapshot>,
        prices: Arc<MockPriceProvider>,
        fallback: Arc<MockFallbackEstimator>,
    ) -> NavEstimatorService {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 1, 31, 6, 30, 0).unwrap(),
        ));
        NavEstimatorService::new(
            Arc::new(MockFundRepository::with_fund(FUND)),
            Arc::new(MockNavHistoryRepository {
                latest: nav.map(nav_entry),
            }),
            Arc::new(MockHoldingsRepository { snapshot }),
            prices,
            fallback,
            clock,
        )
    }

    // =========================================================================
    // Pure computation
    // =========================================================================

    #[test]
    fn change_percent_equals_weighted_change_times_stock_ratio() {
        let snapshot = ten_position_snapshot(0.75, -0.02);
        let prices = uniform_prices(&snapshot, -0.02);
        let result =
            compute_holdings_estimate(FUND, 2.5, &snapshot, &prices, Utc::now()).unwrap();

        let expected = -0.02 * 0.75 * 100.0;
        assert!((result.change_percent - expected).abs() < 1e-9);
    }

    #[test]
    fn missing_single_price_aborts_computation() {
        let snapshot = ten_position_snapshot(0.9, 0.01);
        let mut prices = uniform_prices(&snapshot, 0.01);
        let dropped = snapshot.holdings[3].stock_code.clone();
        prices.remove(&dropped);

        let err = compute_holdings_estimate(FUND, 2.5, &snapshot, &prices, Utc::now())
            .unwrap_err();
        assert_eq!(err, InsufficientInput::MissingPrice(dropped));
    }

    // =========================================================================
    // Orchestration
    // =========================================================================

    /// Scenario A: previous NAV 3.0110, ten positions with a combined
    /// equity-weighted change of -1.51%, stock ratio 0.8963.
    #[tokio::test]
    async fn holdings_based_scenario() {
        let snapshot = ten_position_snapshot(0.8963, -0.0151);
        let prices = Arc::new(MockPriceProvider::new(uniform_prices(&snapshot, -0.0151)));
        let fallback = Arc::new(MockFallbackEstimator::failing());
        let svc = service(Some(3.0110), Some(snapshot), prices.clone(), fallback.clone());

        let result = svc.estimate(FUND).await.unwrap();

        assert_eq!(result.calculation_method, CalculationMethod::HoldingsBased);
        assert_eq!(result.holdings_count, Some(10));
        assert_eq!(result.stock_ratio, Some(0.8963));
        assert_eq!(result.previous_nav, Some(3.0110));
        assert!((result.estimated_nav - 2.9703).abs() < 1e-3);
        assert!((result.change_percent - (-1.3534)).abs() < 1e-3);
        assert_eq!(prices.call_count(), 1);
        assert_eq!(fallback.call_count(), 0);
    }

    /// Scenario D: one stock among ten has no price - the whole call falls
    /// back, no partial computation is returned.
    #[tokio::test]
    async fn partial_prices_fall_back() {
        let snapshot = ten_position_snapshot(0.8963, -0.0151);
        let mut price_map = uniform_prices(&snapshot, -0.0151);
        price_map.remove(&snapshot.holdings[0].stock_code);

        let prices = Arc::new(MockPriceProvider::new(price_map));
        let fallback = Arc::new(MockFallbackEstimator::with_nav(2.98));
        let svc = service(Some(3.0110), Some(snapshot), prices, fallback.clone());

        let result = svc.estimate(FUND).await.unwrap();

        assert_eq!(result.calculation_method, CalculationMethod::Fallback);
        assert_eq!(result.estimated_nav, 2.98);
        assert_eq!(result.stock_ratio, None);
        assert_eq!(result.holdings_count, None);
        assert_eq!(fallback.call_count(), 1);
    }

    /// Scenario B: zero stored holdings - the fallback value is returned
    /// verbatim with stock_ratio and holdings_count unset.
    #[tokio::test]
    async fn empty_holdings_fall_back() {
        let prices = Arc::new(MockPriceProvider::new(HashMap::new()));
        let fallback = Arc::new(MockFallbackEstimator::with_nav(1.2345));
        let svc = service(Some(1.2000), None, prices.clone(), fallback.clone());

        let result = svc.estimate(FUND).await.unwrap();

        assert_eq!(result.calculation_method, CalculationMethod::Fallback);
        assert_eq!(result.estimated_nav, 1.2345);
        assert_eq!(result.previous_nav, Some(1.2000));
        assert!((result.change_percent - 2.875).abs() < 1e-9);
        assert_eq!(result.stock_ratio, None);
        assert_eq!(result.holdings_count, None);
        // The price provider is never consulted without holdings.
        assert_eq!(prices.call_count(), 0);
    }

    /// Scenario C: both paths fail - an explicit error, no fabricated value.
    #[tokio::test(start_paused = true)]
    async fn both_paths_failing_is_unavailable() {
        let prices = Arc::new(MockPriceProvider::new(HashMap::new()));
        let fallback = Arc::new(MockFallbackEstimator::failing());
        let svc = service(Some(1.2000), None, prices, fallback.clone());

        let err = svc.estimate(FUND).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Estimate(EstimateError::Unavailable { .. })
        ));
        // Transient upstream failure is retried exactly once.
        assert_eq!(fallback.call_count(), 2);
    }

    #[tokio::test]
    async fn missing_nav_history_falls_back_without_previous_nav() {
        let snapshot = ten_position_snapshot(0.9, 0.0);
        let prices = Arc::new(MockPriceProvider::new(uniform_prices(&snapshot, 0.0)));
        let fallback = Arc::new(MockFallbackEstimator::with_nav(2.0));
        let svc = service(None, Some(snapshot), prices.clone(), fallback);

        let result = svc.estimate(FUND).await.unwrap();

        assert_eq!(result.calculation_method, CalculationMethod::Fallback);
        assert_eq!(result.previous_nav, None);
        assert_eq!(result.change_percent, 0.0);
        assert_eq!(prices.call_count(), 0);
    }

    #[tokio::test]
    async fn non_positive_stored_nav_falls_back() {
        let snapshot = ten_position_snapshot(0.9, 0.01);
        let prices = Arc::new(MockPriceProvider::new(uniform_prices(&snapshot, 0.01)));
        let fallback = Arc::new(MockFallbackEstimator::with_nav(1.5));
        let svc = service(Some(0.0), Some(snapshot), prices.clone(), fallback.clone());

        let result = svc.estimate(FUND).await.unwrap();

        // A zero NAV anchor would divide to NaN; the holdings path must
        // refuse it and the change stays at zero.
        assert_eq!(result.calculation_method, CalculationMethod::Fallback);
        assert_eq!(result.estimated_nav, 1.5);
        assert_eq!(result.change_percent, 0.0);
        assert!(result.change_percent.is_finite());
        assert_eq!(prices.call_count(), 0);
        assert_eq!(fallback.call_count(), 1);
    }

    #[tokio::test]
    async fn unknown_fund_is_surfaced_immediately() {
        let prices = Arc::new(MockPriceProvider::new(HashMap::new()));
        let fallback = Arc::new(MockFallbackEstimator::with_nav(2.0));
        let svc = service(Some(1.0), None, prices.clone(), fallback.clone());

        let err = svc.estimate("999999").await.unwrap_err();
        assert!(matches!(
            err,
            Error::Estimate(EstimateError::UnknownFund(code)) if code == "999999"
        ));
        assert_eq!(prices.call_count(), 0);
        assert_eq!(fallback.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn transient_price_failure_is_retried_once() {
        let snapshot = ten_position_snapshot(0.5, 0.02);
        let prices = Arc::new(MockPriceProvider::new(uniform_prices(&snapshot, 0.02)));
        prices.fail_next(1);
        let fallback = Arc::new(MockFallbackEstimator::failing());
        let svc = service(Some(2.0), Some(snapshot), prices.clone(), fallback.clone());

        let result = svc.estimate(FUND).await.unwrap();

        assert_eq!(result.calculation_method, CalculationMethod::HoldingsBased);
        assert_eq!(prices.call_count(), 2);
        assert_eq!(fallback.call_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn persistent_price_failure_falls_back() {
        let snapshot = ten_position_snapshot(0.5, 0.02);
        let prices = Arc::new(MockPriceProvider::new(uniform_prices(&snapshot, 0.02)));
        prices.fail_next(2);
        let fallback = Arc::new(MockFallbackEstimator::with_nav(2.01));
        let svc = service(Some(2.0), Some(snapshot), prices.clone(), fallback.clone());

        let result = svc.estimate(FUND).await.unwrap();

        assert_eq!(result.calculation_method, CalculationMethod::Fallback);
        assert_eq!(result.estimated_nav, 2.01);
        assert_eq!(prices.call_count(), 2);
        assert_eq!(fallback.call_count(), 1);
    }
}

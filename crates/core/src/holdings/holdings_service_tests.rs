#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use chrono::{NaiveDate, Utc};

    use crate::errors::{Error, Result};
    use crate::estimator::EstimateError;
    use crate::funds::{Fund, FundRepositoryTrait};
    use crate::holdings::holdings_model::NewHoldingsSnapshot;
    use crate::holdings::{
        Holding, HoldingsRepositoryTrait, HoldingsService, HoldingsServiceTrait, HoldingsSnapshot,
    };

    struct MockFundRepository {
        known: bool,
    }

    #[async_trait]
    impl FundRepositoryTrait for MockFundRepository {
        fn get_by_code(&self, code: &str) -> Result<Option<Fund>> {
            if !self.known {
                return Ok(None);
            }
            let now = Utc::now().naive_utc();
            Ok(Some(Fund {
                id: format!("fund-{}", code),
                code: code.to_string(),
                name: code.to_string(),
                category: None,
                issuer: None,
                created_at: now,
                updated_at: now,
            }))
        }

        fn list(&self) -> Result<Vec<Fund>> {
            Ok(Vec::new())
        }
    }

    struct MockHoldingsRepository {
        holdings: Vec<Holding>,
    }

    #[async_trait]
    impl HoldingsRepositoryTrait for MockHoldingsRepository {
        fn latest_snapshot(&self, _fund_code: &str) -> Result<Option<HoldingsSnapshot>> {
            Ok(None)
        }

        fn holdings_as_of(
            &self,
            _fund_code: &str,
            as_of: Option<NaiveDate>,
        ) -> Result<Vec<Holding>> {
            Ok(self
                .holdings
                .iter()
                .filter(|h| as_of.map_or(true, |d| h.disclosure_date == d))
                .cloned()
                .collect())
        }

        fn has_snapshot(&self, _fund_code: &str, _as_of: NaiveDate) -> Result<bool> {
            Ok(false)
        }

        async fn replace_snapshot(
            &self,
            _fund_code: &str,
            _snapshot: NewHoldingsSnapshot,
        ) -> Result<()> {
            Ok(())
        }
    }

    fn holding(date: NaiveDate) -> Holding {
        Holding {
            id: "h1".to_string(),
            fund_code: "001186".to_string(),
            stock_code: "600519".to_string(),
            stock_name: "Kweichow Moutai".to_string(),
            holding_percentage: 9.38,
            disclosure_date: date,
        }
    }

    #[test]
    fn unknown_fund_is_rejected() {
        let service = HoldingsService::new(
            Arc::new(MockFundRepository { known: false }),
            Arc::new(MockHoldingsRepository {
                holdings: Vec::new(),
            }),
        );

        let err = service.get_holdings("999999", None).unwrap_err();
        assert!(matches!(
            err,
            Error::Estimate(EstimateError::UnknownFund(code)) if code == "999999"
        ));
    }

    #[test]
    fn as_of_filter_is_passed_through() {
        let q1 = NaiveDate::from_ymd_opt(2023, 9, 30).unwrap();
        let q2 = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
        let service = HoldingsService::new(
            Arc::new(MockFundRepository { known: true }),
            Arc::new(MockHoldingsRepository {
                holdings: vec![holding(q1), holding(q2)],
            }),
        );

        let all = service.get_holdings("001186", None).unwrap();
        assert_eq!(all.len(), 2);

        let filtered = service.get_holdings("001186", Some(q2)).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].disclosure_date, q2);
    }
}

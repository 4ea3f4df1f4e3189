//! Tiantian Fund real-time estimate client.
//!
//! The `fundgz` endpoint answers with a JSONP wrapper
//! (`jsonpgz({...});`) whose payload carries the provider's own intraday
//! NAV estimate. Used as the fallback when the holdings-based computation
//! cannot be trusted.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;

use super::errors::ProviderError;
use super::models::FallbackEstimate;
use super::traits::FallbackEstimatorTrait;
use crate::constants::PROVIDER_REQUEST_TIMEOUT_SECS;

const TIANTIAN_BASE_URL: &str = "https://fundgz.1234567.com.cn/js";

#[derive(Clone)]
pub struct TiantianClient {
    client: Client,
    jsonp: Regex,
}

/// JSONP payload. All numeric fields arrive as strings.
#[derive(Deserialize)]
struct TiantianPayload {
    /// Estimated NAV ("gsz")
    gsz: String,
    /// Estimate timestamp ("gztime"), e.g. "2024-01-31 14:58"
    gztime: String,
}

impl TiantianClient {
    pub fn new() -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(PROVIDER_REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        let jsonp = Regex::new(r"jsonpgz\((.*)\)")
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;
        Ok(Self { client, jsonp })
    }

    fn parse_body(&self, body: &str) -> Result<FallbackEstimate, ProviderError> {
        let json = self
            .jsonp
            .captures(body)
            .and_then(|c| c.get(1))
            .ok_or_else(|| {
                ProviderError::InvalidResponse("response is not a jsonpgz wrapper".into())
            })?
            .as_str();

        let payload: TiantianPayload = serde_json::from_str(json)
            .map_err(|e| ProviderError::InvalidResponse(e.to_string()))?;

        let nav = payload
            .gsz
            .parse::<f64>()
            .map_err(|e| ProviderError::InvalidResponse(format!("bad gsz value: {}", e)))?;
        let as_of = NaiveDateTime::parse_from_str(&payload.gztime, "%Y-%m-%d %H:%M")
            .map_err(|e| ProviderError::InvalidResponse(format!("bad gztime value: {}", e)))?;

        Ok(FallbackEstimate { nav, as_of })
    }
}

#[async_trait]
impl FallbackEstimatorTrait for TiantianClient {
    async fn estimate(&self, fund_code: &str) -> Result<FallbackEstimate, ProviderError> {
        let url = format!("{}/{}.js", TIANTIAN_BASE_URL, fund_code);
        let response = self.client.get(&url).send().await?;

        // The endpoint answers 404 for codes it does not track.
        if !response.status().is_success() {
            return Err(ProviderError::Unavailable(format!(
                "estimate request for {} failed: {}",
                fund_code,
                response.status()
            )));
        }

        let body = response.text().await?;
        self.parse_body(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_jsonp_wrapper() {
        let client = TiantianClient::new().unwrap();
        let body = r#"jsonpgz({"fundcode":"001186","name":"Example Mixed A","jzrq":"2024-01-30","dwjz":"3.0110","gsz":"2.9703","gszzl":"-1.35","gztime":"2024-01-31 14:58"});"#;
        let estimate = client.parse_body(body).unwrap();
        assert!((estimate.nav - 2.9703).abs() < 1e-9);
        assert_eq!(
            estimate.as_of,
            NaiveDateTime::parse_from_str("2024-01-31 14:58", "%Y-%m-%d %H:%M").unwrap()
        );
    }

    #[test]
    fn rejects_non_jsonp_body() {
        let client = TiantianClient::new().unwrap();
        let err = client.parse_body("<html>error</html>").unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse(_)));
    }
}

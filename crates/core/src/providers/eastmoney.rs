//! Eastmoney API clients for batch stock quotes and fund disclosures.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

use super::errors::ProviderError;
use super::models::StockPrice;
use super::traits::{DisclosureSourceTrait, PriceProviderTrait};
use crate::constants::PROVIDER_REQUEST_TIMEOUT_SECS;
use crate::holdings::holdings_model::{NewAssetAllocation, NewHolding, NewHoldingsSnapshot};

const QUOTE_BASE_URL: &str = "https://push2.eastmoney.com/api/qt/ulist.np/get";
const FUND_API_BASE_URL: &str = "https://fundmobapi.eastmoney.com/FundMNewApi";

/// Eastmoney client, serving both the batch quote API and the fund
/// disclosure (F10) API.
#[derive(Clone)]
pub struct EastmoneyClient {
    client: Client,
}

impl EastmoneyClient {
    pub fn new() -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(PROVIDER_REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        Ok(Self { client })
    }

    /// Exchange-prefixed security id the quote API expects
    /// ("1." Shanghai, "0." Shenzhen).
    fn secid(stock_code: &str) -> String {
        match stock_code.chars().next() {
            Some('5') | Some('6') | Some('9') => format!("1.{}", stock_code),
            _ => format!("0.{}", stock_code),
        }
    }
}

/// Quote list response envelope. Field names follow the upstream API:
/// f12 = code, f2 = last price, f18 = previous close. Suspended stocks
/// carry "-" instead of a number, so prices are kept as raw JSON values
/// and dropped when not numeric.
#[derive(Deserialize)]
struct QuoteListResponse {
    data: Option<QuoteListData>,
}

#[derive(Deserialize)]
struct QuoteListData {
    diff: Vec<QuoteEntry>,
}

#[derive(Deserialize)]
struct QuoteEntry {
    f12: String,
    #[serde(default)]
    f2: Value,
    #[serde(default)]
    f18: Value,
}

fn numeric(value: &Value) -> Option<f64> {
    value.as_f64().filter(|v| *v > 0.0)
}

#[async_trait]
impl PriceProviderTrait for EastmoneyClient {
    async fn get_prices(
        &self,
        stock_codes: &[String],
    ) -> Result<HashMap<String, StockPrice>, ProviderError> {
        if stock_codes.is_empty() {
            return Ok(HashMap::new());
        }

        let secids: Vec<String> = stock_codes.iter().map(|c| Self::secid(c)).collect();
        let response = self
            .client
            .get(QUOTE_BASE_URL)
            .query(&[
                ("fltt", "2"),
                ("invt", "2"),
                ("fields", "f2,f12,f18"),
                ("secids", &secids.join(",")),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Unavailable(format!(
                "quote request failed: {}",
                response.status()
            )));
        }

        let body: QuoteListResponse = response.json().await?;
        let entries = body.data.map(|d| d.diff).unwrap_or_default();

        let mut prices = HashMap::new();
        for entry in entries {
            // Unpriced codes are omitted rather than reported as zero.
            if let (Some(current), Some(previous_close)) =
                (numeric(&entry.f2), numeric(&entry.f18))
            {
                prices.insert(
                    entry.f12,
                    StockPrice {
                        current,
                        previous_close,
                    },
                );
            }
        }
        Ok(prices)
    }
}

/// Fund API envelope. `Expansion` carries the disclosure date for the
/// holdings endpoint.
#[derive(Deserialize)]
struct FundApiResponse<T> {
    #[serde(rename = "Datas")]
    datas: Option<T>,
    #[serde(rename = "Expansion")]
    expansion: Option<String>,
}

#[derive(Deserialize)]
struct InvestPosition {
    #[serde(rename = "fundStocks", default)]
    fund_stocks: Vec<FundStock>,
}

#[derive(Deserialize)]
struct FundStock {
    /// Stock code
    #[serde(rename = "GPDM")]
    code: String,
    /// Stock short name
    #[serde(rename = "GPJC", default)]
    name: String,
    /// Percentage of fund NAV, as a string like "9.38"
    #[serde(rename = "JZBL")]
    nav_percentage: String,
}

#[derive(Deserialize)]
struct AllocationRow {
    /// Stock / bond / cash / other weights, percent strings or "--"
    #[serde(rename = "GP", default)]
    stock: String,
    #[serde(rename = "ZQ", default)]
    bond: String,
    #[serde(rename = "HB", default)]
    cash: String,
    #[serde(rename = "QT", default)]
    other: String,
    /// Report date of the row
    #[serde(rename = "FSRQ", default)]
    report_date: String,
}

/// Disclosure weights arrive as percent strings and "--" for absent values.
fn parse_ratio(raw: &str) -> f64 {
    raw.trim_end_matches('%').parse::<f64>().unwrap_or(0.0) / 100.0
}

impl EastmoneyClient {
    async fn fetch_invest_position(
        &self,
        fund_code: &str,
    ) -> Result<FundApiResponse<InvestPosition>, ProviderError> {
        let url = format!("{}/FundMNInverstPosition", FUND_API_BASE_URL);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("FCODE", fund_code),
                ("plat", "Android"),
                ("product", "EFund"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Unavailable(format!(
                "holdings request failed: {}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }

    async fn fetch_asset_allocation(
        &self,
        fund_code: &str,
    ) -> Result<Vec<AllocationRow>, ProviderError> {
        let url = format!("{}/FundMNAssetAllocationNew", FUND_API_BASE_URL);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("FCODE", fund_code),
                ("plat", "Android"),
                ("product", "EFund"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ProviderError::Unavailable(format!(
                "allocation request failed: {}",
                response.status()
            )));
        }
        let body: FundApiResponse<Vec<AllocationRow>> = response.json().await?;
        Ok(body.datas.unwrap_or_default())
    }
}

#[async_trait]
impl DisclosureSourceTrait for EastmoneyClient {
    async fn latest_holdings(
        &self,
        fund_code: &str,
    ) -> Result<Option<NewHoldingsSnapshot>, ProviderError> {
        let position = self.fetch_invest_position(fund_code).await?;

        let as_of = match position
            .expansion
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        {
            Some(date) => date,
            None => return Ok(None),
        };

        let stocks = position.datas.map(|d| d.fund_stocks).unwrap_or_default();
        if stocks.is_empty() {
            return Ok(None);
        }

        let holdings: Vec<NewHolding> = stocks
            .into_iter()
            .filter_map(|s| {
                let percentage = s.nav_percentage.parse::<f64>().ok()?;
                Some(NewHolding {
                    stock_code: s.code,
                    stock_name: s.name,
                    holding_percentage: percentage,
                })
            })
            .collect();
        if holdings.is_empty() {
            return Ok(None);
        }

        // Rows are newest-first; prefer the one matching the holdings
        // disclosure date so both sides describe the same report.
        let rows = self.fetch_asset_allocation(fund_code).await?;
        let allocation = rows
            .iter()
            .find(|r| r.report_date == as_of.format("%Y-%m-%d").to_string())
            .or_else(|| rows.first());
        let allocation = match allocation {
            Some(row) => NewAssetAllocation {
                stock_ratio: parse_ratio(&row.stock),
                bond_ratio: parse_ratio(&row.bond),
                cash_ratio: parse_ratio(&row.cash),
                other_ratio: parse_ratio(&row.other),
            },
            None => return Ok(None),
        };

        Ok(Some(NewHoldingsSnapshot {
            as_of,
            holdings,
            allocation,
        }))
    }
}

//! Database models for disclosed holdings and asset allocations.

use chrono::NaiveDate;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Database model for one disclosed stock position
#[derive(
    Insertable, Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::fund_holdings)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct FundHoldingDB {
    pub id: String,
    pub fund_code: String,
    pub stock_code: String,
    pub stock_name: String,
    pub holding_percentage: f64,
    pub disclosure_date: NaiveDate,
}

/// Database model for one asset-allocation row
#[derive(
    Insertable, Queryable, Identifiable, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::fund_asset_allocations)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct AssetAllocationDB {
    pub id: String,
    pub fund_code: String,
    pub stock_ratio: f64,
    pub bond_ratio: f64,
    pub cash_ratio: f64,
    pub other_ratio: f64,
    pub disclosure_date: NaiveDate,
}

// Conversions to domain models
impl From<FundHoldingDB> for fundpulse_core::holdings::Holding {
    fn from(db: FundHoldingDB) -> Self {
        Self {
            id: db.id,
            fund_code: db.fund_code,
            stock_code: db.stock_code,
            stock_name: db.stock_name,
            holding_percentage: db.holding_percentage,
            disclosure_date: db.disclosure_date,
        }
    }
}

impl From<AssetAllocationDB> for fundpulse_core::holdings::AssetAllocation {
    fn from(db: AssetAllocationDB) -> Self {
        Self {
            fund_code: db.fund_code,
            stock_ratio: db.stock_ratio,
            bond_ratio: db.bond_ratio,
            cash_ratio: db.cash_ratio,
            other_ratio: db.other_ratio,
            disclosure_date: db.disclosure_date,
        }
    }
}

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel::SqliteConnection;
use fundpulse_core::holdings::holdings_model::NewHoldingsSnapshot;
use fundpulse_core::holdings::{
    AssetAllocation, Holding, HoldingsRepositoryTrait, HoldingsSnapshot,
};
use fundpulse_core::Result;
use std::sync::Arc;
use uuid::Uuid;

use super::model::{AssetAllocationDB, FundHoldingDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::{fund_asset_allocations, fund_holdings};

pub struct HoldingsRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl HoldingsRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        HoldingsRepository { pool, writer }
    }

    fn latest_disclosure_date(
        conn: &mut SqliteConnection,
        for_fund: &str,
    ) -> Result<Option<NaiveDate>> {
        let date = fund_holdings::table
            .filter(fund_holdings::fund_code.eq(for_fund))
            .select(diesel::dsl::max(fund_holdings::disclosure_date))
            .first::<Option<NaiveDate>>(conn)
            .map_err(StorageError::from)?;
        Ok(date)
    }
}

#[async_trait]
impl HoldingsRepositoryTrait for HoldingsRepository {
    fn latest_snapshot(&self, fund_code: &str) -> Result<Option<HoldingsSnapshot>> {
        let mut conn = get_connection(&self.pool)?;

        let as_of = match Self::latest_disclosure_date(&mut conn, fund_code)? {
            Some(date) => date,
            None => return Ok(None),
        };

        let holdings_db = fund_holdings::table
            .filter(fund_holdings::fund_code.eq(fund_code))
            .filter(fund_holdings::disclosure_date.eq(as_of))
            .order(fund_holdings::holding_percentage.desc())
            .load::<FundHoldingDB>(&mut conn)
            .map_err(StorageError::from)?;

        // Both sides of a disclosure are written in one transaction, so a
        // missing allocation means no usable snapshot.
        let allocation_db = fund_asset_allocations::table
            .filter(fund_asset_allocations::fund_code.eq(fund_code))
            .filter(fund_asset_allocations::disclosure_date.eq(as_of))
            .first::<AssetAllocationDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        let allocation = match allocation_db {
            Some(allocation) => AssetAllocation::from(allocation),
            None => return Ok(None),
        };

        Ok(Some(HoldingsSnapshot {
            as_of,
            holdings: holdings_db.into_iter().map(Holding::from).collect(),
            allocation,
        }))
    }

    fn holdings_as_of(&self, fund_code: &str, as_of: Option<NaiveDate>) -> Result<Vec<Holding>> {
        let mut conn = get_connection(&self.pool)?;

        let date = match as_of {
            Some(date) => Some(date),
            None => Self::latest_disclosure_date(&mut conn, fund_code)?,
        };
        let date = match date {
            Some(date) => date,
            None => return Ok(Vec::new()),
        };

        let holdings_db = fund_holdings::table
            .filter(fund_holdings::fund_code.eq(fund_code))
            .filter(fund_holdings::disclosure_date.eq(date))
            .order(fund_holdings::holding_percentage.desc())
            .load::<FundHoldingDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(holdings_db.into_iter().map(Holding::from).collect())
    }

    fn has_snapshot(&self, fund_code: &str, as_of: NaiveDate) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        let count: i64 = fund_holdings::table
            .filter(fund_holdings::fund_code.eq(fund_code))
            .filter(fund_holdings::disclosure_date.eq(as_of))
            .count()
            .get_result(&mut conn)
            .map_err(StorageError::from)?;
        Ok(count > 0)
    }

    async fn replace_snapshot(&self, fund_code: &str, snapshot: NewHoldingsSnapshot) -> Result<()> {
        let for_fund = fund_code.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                // Wholesale replacement for this disclosure date; rows for
                // earlier dates stay untouched as history.
                diesel::delete(
                    fund_holdings::table
                        .filter(fund_holdings::fund_code.eq(&for_fund))
                        .filter(fund_holdings::disclosure_date.eq(snapshot.as_of)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;
                diesel::delete(
                    fund_asset_allocations::table
                        .filter(fund_asset_allocations::fund_code.eq(&for_fund))
                        .filter(fund_asset_allocations::disclosure_date.eq(snapshot.as_of)),
                )
                .execute(conn)
                .map_err(StorageError::from)?;

                let holdings_db: Vec<FundHoldingDB> = snapshot
                    .holdings
                    .iter()
                    .map(|h| FundHoldingDB {
                        id: Uuid::new_v4().to_string(),
                        fund_code: for_fund.clone(),
                        stock_code: h.stock_code.clone(),
                        stock_name: h.stock_name.clone(),
                        holding_percentage: h.holding_percentage,
                        disclosure_date: snapshot.as_of,
                    })
                    .collect();
                diesel::insert_into(fund_holdings::table)
                    .values(&holdings_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                let allocation_db = AssetAllocationDB {
                    id: Uuid::new_v4().to_string(),
                    fund_code: for_fund.clone(),
                    stock_ratio: snapshot.allocation.stock_ratio,
                    bond_ratio: snapshot.allocation.bond_ratio,
                    cash_ratio: snapshot.allocation.cash_ratio,
                    other_ratio: snapshot.allocation.other_ratio,
                    disclosure_date: snapshot.as_of,
                };
                diesel::insert_into(fund_asset_allocations::table)
                    .values(&allocation_db)
                    .execute(conn)
                    .map_err(StorageError::from)?;

                Ok(())
            })
            .await
    }
}

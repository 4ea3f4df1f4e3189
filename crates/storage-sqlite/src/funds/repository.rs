use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use fundpulse_core::funds::{Fund, FundRepositoryTrait};
use fundpulse_core::Result;
use std::sync::Arc;
use uuid::Uuid;

use super::model::{FundDB, NewFundDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::funds;
use crate::schema::funds::dsl::*;

pub struct FundRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl FundRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        FundRepository { pool, writer }
    }

    /// Registers a fund code if it is not tracked yet. Fund CRUD proper
    /// lives outside the estimation core; this exists for seeding the
    /// tracked-fund list (and tests).
    pub async fn ensure_fund(&self, fund_code: &str, fund_name: &str) -> Result<Fund> {
        let fund_code = fund_code.to_string();
        let fund_name = fund_name.to_string();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Fund> {
                let existing = funds
                    .filter(code.eq(&fund_code))
                    .first::<FundDB>(conn)
                    .optional()
                    .map_err(StorageError::from)?;
                if let Some(existing) = existing {
                    return Ok(Fund::from(existing));
                }

                let now = Utc::now().naive_utc();
                let new_fund = NewFundDB {
                    id: Uuid::new_v4().to_string(),
                    code: fund_code,
                    name: fund_name,
                    category: None,
                    issuer: None,
                    created_at: now,
                    updated_at: now,
                };
                let result_db = diesel::insert_into(funds::table)
                    .values(&new_fund)
                    .returning(FundDB::as_returning())
                    .get_result(conn)
                    .map_err(StorageError::from)?;
                Ok(Fund::from(result_db))
            })
            .await
    }
}

#[async_trait]
impl FundRepositoryTrait for FundRepository {
    fn get_by_code(&self, fund_code: &str) -> Result<Option<Fund>> {
        let mut conn = get_connection(&self.pool)?;
        let fund_db = funds
            .filter(code.eq(fund_code))
            .first::<FundDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(fund_db.map(Fund::from))
    }

    fn list(&self) -> Result<Vec<Fund>> {
        let mut conn = get_connection(&self.pool)?;
        let funds_db = funds
            .order(code.asc())
            .load::<FundDB>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(funds_db.into_iter().map(Fund::from).collect())
    }
}

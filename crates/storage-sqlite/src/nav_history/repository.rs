use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use fundpulse_core::nav_history::{NavHistoryEntry, NavHistoryRepositoryTrait};
use fundpulse_core::Result;
use std::sync::Arc;
use uuid::Uuid;

use super::model::NavHistoryDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::nav_history;

pub struct NavHistoryRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl NavHistoryRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        NavHistoryRepository { pool, writer }
    }
}

#[async_trait]
impl NavHistoryRepositoryTrait for NavHistoryRepository {
    fn latest(&self, fund_code: &str) -> Result<Option<NavHistoryEntry>> {
        let mut conn = get_connection(&self.pool)?;
        let entry_db = nav_history::table
            .filter(nav_history::fund_code.eq(fund_code))
            .order(nav_history::date.desc())
            .first::<NavHistoryDB>(&mut conn)
            .optional()
            .map_err(StorageError::from)?;
        Ok(entry_db.map(NavHistoryEntry::from))
    }

    async fn upsert_entries(&self, entries: Vec<NavHistoryEntry>) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut affected_rows = 0;
                for entry in entries {
                    let entry_db = NavHistoryDB {
                        id: Uuid::new_v4().to_string(),
                        fund_code: entry.fund_code,
                        date: entry.date,
                        nav: entry.nav,
                        accumulated_nav: entry.accumulated_nav,
                        daily_growth: entry.daily_growth,
                    };
                    affected_rows += diesel::insert_into(nav_history::table)
                        .values(&entry_db)
                        .on_conflict((nav_history::fund_code, nav_history::date))
                        .do_update()
                        .set((
                            nav_history::nav.eq(entry_db.nav),
                            nav_history::accumulated_nav.eq(entry_db.accumulated_nav),
                            nav_history::daily_growth.eq(entry_db.daily_growth),
                        ))
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(affected_rows)
            })
            .await
    }
}

//! Database model for published NAV history.

use chrono::NaiveDate;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Insertable,
    Queryable,
    Identifiable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::nav_history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct NavHistoryDB {
    pub id: String,
    pub fund_code: String,
    pub date: NaiveDate,
    pub nav: f64,
    pub accumulated_nav: Option<f64>,
    pub daily_growth: Option<f64>,
}

impl From<NavHistoryDB> for fundpulse_core::nav_history::NavHistoryEntry {
    fn from(db: NavHistoryDB) -> Self {
        Self {
            fund_code: db.fund_code,
            date: db.date,
            nav: db.nav,
            accumulated_nav: db.accumulated_nav,
            daily_growth: db.daily_growth,
        }
    }
}

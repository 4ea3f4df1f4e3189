//! Database models for funds.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Database model for funds
#[derive(
    Queryable, Identifiable, AsChangeset, Selectable, PartialEq, Serialize, Deserialize, Debug, Clone,
)]
#[diesel(table_name = crate::schema::funds)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
#[serde(rename_all = "camelCase")]
pub struct FundDB {
    pub id: String,
    pub code: String,
    pub name: String,
    pub category: Option<String>,
    pub issuer: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for registering a new fund
#[derive(Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::funds)]
#[serde(rename_all = "camelCase")]
pub struct NewFundDB {
    pub id: String,
    pub code: String,
    pub name: String,
    pub category: Option<String>,
    pub issuer: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

// Conversion to domain model
impl From<FundDB> for fundpulse_core::funds::Fund {
    fn from(db: FundDB) -> Self {
        Self {
            id: db.id,
            code: db.code,
            name: db.name,
            category: db.category,
            issuer: db.issuer,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

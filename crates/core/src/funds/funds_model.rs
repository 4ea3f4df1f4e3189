//! Fund domain model.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A tracked fund. The code is the immutable identifier used everywhere in
/// the estimation core; the descriptive fields are display metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fund {
    pub id: String,
    pub code: String,
    pub name: String,
    pub category: Option<String>,
    pub issuer: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

//! Sync outcome models.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Per-fund result of one sync run. Observability output only; the
/// estimator never reads these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum SyncOutcome {
    /// New disclosure rows were written and the cache entry evicted.
    Updated {
        as_of: NaiveDate,
        holdings_count: usize,
    },
    /// The latest disclosure was already stored; nothing written.
    AlreadyCurrent { as_of: NaiveDate },
    /// The fund has no public disclosure (yet).
    SkippedNoDisclosure,
    /// This fund's fetch or write failed; other funds are unaffected.
    Failed { reason: String },
}

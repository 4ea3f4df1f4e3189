use chrono::NaiveDate;
use fundpulse_core::funds::FundRepositoryTrait;
use fundpulse_core::holdings::holdings_model::{
    NewAssetAllocation, NewHolding, NewHoldingsSnapshot,
};
use fundpulse_core::holdings::HoldingsRepositoryTrait;
use fundpulse_core::nav_history::{NavHistoryEntry, NavHistoryRepositoryTrait};
use fundpulse_storage_sqlite::funds::FundRepository;
use fundpulse_storage_sqlite::holdings::HoldingsRepository;
use fundpulse_storage_sqlite::nav_history::NavHistoryRepository;
use fundpulse_storage_sqlite::{init, spawn_writer, DbPool, WriteHandle};
use std::sync::Arc;
use tempfile::TempDir;

struct TestDb {
    // Keeps the database file alive for the duration of the test.
    _dir: TempDir,
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

fn setup() -> TestDb {
    let dir = TempDir::new().expect("create temp dir");
    let db_path = dir.path().join("fundpulse-test.db");
    let pool = init(db_path.to_str().expect("utf-8 path")).expect("init database");
    let writer = spawn_writer(pool.clone());
    TestDb {
        _dir: dir,
        pool,
        writer,
    }
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date")
}

fn sample_snapshot(as_of: NaiveDate) -> NewHoldingsSnapshot {
    NewHoldingsSnapshot {
        as_of,
        holdings: vec![
            NewHolding {
                stock_code: "600519".to_string(),
                stock_name: "Kweichow Moutai".to_string(),
                holding_percentage: 9.5,
            },
            NewHolding {
                stock_code: "000858".to_string(),
                stock_name: "Wuliangye".to_string(),
                holding_percentage: 7.2,
            },
        ],
        allocation: NewAssetAllocation {
            stock_ratio: 0.92,
            bond_ratio: 0.03,
            cash_ratio: 0.04,
            other_ratio: 0.01,
        },
    }
}

#[tokio::test]
async fn ensure_fund_is_idempotent() {
    let db = setup();
    let repository = FundRepository::new(db.pool.clone(), db.writer.clone());

    let first = repository
        .ensure_fund("161725", "Invesco Great Wall CSI Liquor")
        .await
        .expect("insert fund");
    let second = repository
        .ensure_fund("161725", "renamed later")
        .await
        .expect("re-ensure fund");

    assert_eq!(first.id, second.id);
    assert_eq!(second.name, "Invesco Great Wall CSI Liquor");

    let fetched = repository
        .get_by_code("161725")
        .expect("query fund")
        .expect("fund present");
    assert_eq!(fetched.code, "161725");
    assert!(repository.get_by_code("999999").expect("query").is_none());
}

#[tokio::test]
async fn list_returns_funds_ordered_by_code() {
    let db = setup();
    let repository = FundRepository::new(db.pool.clone(), db.writer.clone());

    repository.ensure_fund("110022", "b").await.expect("insert");
    repository.ensure_fund("005827", "a").await.expect("insert");

    let funds = repository.list().expect("list funds");
    let codes: Vec<&str> = funds.iter().map(|f| f.code.as_str()).collect();
    assert_eq!(codes, vec!["005827", "110022"]);
}

#[tokio::test]
async fn replace_snapshot_is_wholesale_per_disclosure_date() {
    let db = setup();
    let fund_repository = FundRepository::new(db.pool.clone(), db.writer.clone());
    let repository = HoldingsRepository::new(db.pool.clone(), db.writer.clone());

    fund_repository
        .ensure_fund("161725", "test fund")
        .await
        .expect("insert fund");

    let q1 = date("2025-03-31");
    repository
        .replace_snapshot("161725", sample_snapshot(q1))
        .await
        .expect("write first snapshot");

    // Rewriting the same date replaces rather than appends.
    let mut rewritten = sample_snapshot(q1);
    rewritten.holdings.truncate(1);
    rewritten.holdings[0].holding_percentage = 10.0;
    repository
        .replace_snapshot("161725", rewritten)
        .await
        .expect("rewrite snapshot");

    let snapshot = repository
        .latest_snapshot("161725")
        .expect("read snapshot")
        .expect("snapshot present");
    assert_eq!(snapshot.as_of, q1);
    assert_eq!(snapshot.holdings.len(), 1);
    assert_eq!(snapshot.holdings[0].holding_percentage, 10.0);
    assert_eq!(snapshot.allocation.stock_ratio, 0.92);
}

#[tokio::test]
async fn latest_snapshot_follows_newest_disclosure_date() {
    let db = setup();
    let fund_repository = FundRepository::new(db.pool.clone(), db.writer.clone());
    let repository = HoldingsRepository::new(db.pool.clone(), db.writer.clone());

    fund_repository
        .ensure_fund("161725", "test fund")
        .await
        .expect("insert fund");

    let q1 = date("2025-03-31");
    let q2 = date("2025-06-30");
    repository
        .replace_snapshot("161725", sample_snapshot(q1))
        .await
        .expect("write q1");
    let mut newer = sample_snapshot(q2);
    newer.allocation.stock_ratio = 0.88;
    repository
        .replace_snapshot("161725", newer)
        .await
        .expect("write q2");

    let snapshot = repository
        .latest_snapshot("161725")
        .expect("read snapshot")
        .expect("snapshot present");
    assert_eq!(snapshot.as_of, q2);
    assert_eq!(snapshot.allocation.stock_ratio, 0.88);

    // Older disclosures stay queryable as history.
    let older = repository
        .holdings_as_of("161725", Some(q1))
        .expect("read q1 holdings");
    assert_eq!(older.len(), 2);
    assert!(older.iter().all(|h| h.disclosure_date == q1));

    // Holdings within one date come back largest position first.
    assert_eq!(older[0].stock_code, "600519");

    assert!(repository.has_snapshot("161725", q1).expect("has q1"));
    assert!(!repository
        .has_snapshot("161725", date("2025-09-30"))
        .expect("has q3"));
}

#[tokio::test]
async fn holdings_queries_are_empty_for_untracked_fund() {
    let db = setup();
    let repository = HoldingsRepository::new(db.pool.clone(), db.writer.clone());

    assert!(repository
        .latest_snapshot("000000")
        .expect("read snapshot")
        .is_none());
    assert!(repository
        .holdings_as_of("000000", None)
        .expect("read holdings")
        .is_empty());
}

#[tokio::test]
async fn nav_history_upsert_overwrites_same_day_entry() {
    let db = setup();
    let fund_repository = FundRepository::new(db.pool.clone(), db.writer.clone());
    let repository = NavHistoryRepository::new(db.pool.clone(), db.writer.clone());

    fund_repository
        .ensure_fund("161725", "test fund")
        .await
        .expect("insert fund");

    let entry = |d: &str, nav: f64| NavHistoryEntry {
        fund_code: "161725".to_string(),
        date: date(d),
        nav,
        accumulated_nav: Some(nav + 1.0),
        daily_growth: Some(0.5),
    };

    repository
        .upsert_entries(vec![entry("2025-08-27", 3.0050), entry("2025-08-28", 3.0110)])
        .await
        .expect("insert entries");

    // Same-day re-publish corrects the stored value in place.
    repository
        .upsert_entries(vec![entry("2025-08-28", 3.0125)])
        .await
        .expect("upsert entry");

    let latest = repository
        .latest("161725")
        .expect("read latest")
        .expect("entry present");
    assert_eq!(latest.date, date("2025-08-28"));
    assert_eq!(latest.nav, 3.0125);

    assert!(repository.latest("000000").expect("read").is_none());
}

//! Emergency fund MCP Tools
//!
//! Balance against a savings target, plus balance snapshots over time. Reading
//! the fund records one snapshot per calendar month on its own.

use serde::Serialize;

use crate::db::Database;
use crate::models::{EmergencyFund, EmergencyFundUpdate, SavingsSnapshot};

use super::{parse_date, progress_percent, round_cents, DATE_FORMAT};

/// Response for emergency_fund_status
#[derive(Debug, Serialize)]
pub struct FundStatus {
    #[serde(flatten)]
    pub fund: EmergencyFund,
    pub target: f64,
    /// Progress toward the target, 0 to 100
    pub percent: i64,
    pub shortfall: f64,
    /// Set when this call recorded the month's automatic snapshot
    pub auto_snapshot: Option<SavingsSnapshot>,
}

/// Response for list_savings_snapshots
#[derive(Debug, Serialize)]
pub struct ListSnapshotsResponse {
    pub snapshots: Vec<SavingsSnapshot>,
    pub total: usize,
}

fn status_of(fund: EmergencyFund, auto_snapshot: Option<SavingsSnapshot>) -> FundStatus {
    let target = fund.target();
    FundStatus {
        percent: progress_percent(fund.balance, target),
        shortfall: round_cents((target - fund.balance).max(0.0)),
        target,
        fund,
        auto_snapshot,
    }
}

/// Current fund standing as of `today`. The first read in a calendar month
/// snapshots the balance.
pub fn fund_status(db: &Database, today: &str) -> Result<FundStatus, String> {
    let today = parse_date(today)?.format(DATE_FORMAT).to_string();

    let (fund, snapshot) = db
        .with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let fund = EmergencyFund::get(&tx)?;

            let last_month = SavingsSnapshot::latest(&tx)?.map(|s| s.date.chars().take(7).collect::<String>());
            let snapshot = if last_month.as_deref() != Some(&today[..7]) {
                Some(SavingsSnapshot::create(&tx, &today, fund.balance)?)
            } else {
                None
            };

            tx.commit()?;
            Ok((fund, snapshot))
        })
        .map_err(|e| format!("Failed to read emergency fund: {}", e))?;

    if let Some(s) = &snapshot {
        tracing::info!(date = %s.date, balance = s.balance, "Recorded monthly savings snapshot");
    }
    Ok(status_of(fund, snapshot))
}

/// Change any of balance, baseline, monthly expenses or months target
pub fn update_fund(db: &Database, update: &EmergencyFundUpdate) -> Result<FundStatus, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let fund = EmergencyFund::update(&conn, update).map_err(|e| format!("Failed to update emergency fund: {}", e))?;

    tracing::info!(balance = fund.balance, target = fund.target(), "Updated emergency fund");
    Ok(status_of(fund, None))
}

/// Record the current balance for `date`
pub fn log_snapshot(db: &Database, date: &str) -> Result<SavingsSnapshot, String> {
    let date = parse_date(date)?.format(DATE_FORMAT).to_string();
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let fund = EmergencyFund::get(&conn).map_err(|e| format!("Failed to read emergency fund: {}", e))?;
    SavingsSnapshot::create(&conn, &date, fund.balance).map_err(|e| format!("Failed to log snapshot: {}", e))
}

/// Snapshots in recording order
pub fn list_snapshots(db: &Database) -> Result<ListSnapshotsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let snapshots = SavingsSnapshot::list_all(&conn).map_err(|e| format!("Failed to list snapshots: {}", e))?;
    let total = snapshots.len();
    Ok(ListSnapshotsResponse { snapshots, total })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_balance(db: &Database, balance: f64) -> FundStatus {
        let update = EmergencyFundUpdate {
            balance: Some(balance),
            ..Default::default()
        };
        update_fund(db, &update).unwrap()
    }

    #[test]
    fn test_status_target_and_percent() {
        let db = Database::in_memory().unwrap();
        let status = set_balance(&db, 7650.0);

        assert_eq!(status.target, 30600.0);
        assert_eq!(status.percent, 25);
        assert_eq!(status.shortfall, 22950.0);
    }

    #[test]
    fn test_percent_is_capped() {
        let db = Database::in_memory().unwrap();
        let status = set_balance(&db, 40000.0);
        assert_eq!(status.percent, 100);
        assert_eq!(status.shortfall, 0.0);
    }

    #[test]
    fn test_auto_snapshot_once_per_month() {
        let db = Database::in_memory().unwrap();
        set_balance(&db, 1000.0);

        let first = fund_status(&db, "2025-03-02").unwrap();
        let snapshot = first.auto_snapshot.unwrap();
        assert_eq!(snapshot.date, "2025-03-02");
        assert_eq!(snapshot.balance, 1000.0);

        set_balance(&db, 1200.0);
        assert!(fund_status(&db, "2025-03-20").unwrap().auto_snapshot.is_none());

        let april = fund_status(&db, "2025-04-01").unwrap();
        assert_eq!(april.auto_snapshot.unwrap().balance, 1200.0);
        assert_eq!(list_snapshots(&db).unwrap().total, 2);
    }

    #[test]
    fn test_manual_snapshots_are_always_recorded() {
        let db = Database::in_memory().unwrap();
        set_balance(&db, 500.0);

        log_snapshot(&db, "2025-03-01").unwrap();
        log_snapshot(&db, "2025-03-01").unwrap();

        // a manual snapshot this month satisfies the automatic one
        assert!(fund_status(&db, "2025-03-15").unwrap().auto_snapshot.is_none());
        assert_eq!(list_snapshots(&db).unwrap().total, 2);
        assert!(log_snapshot(&db, "someday").is_err());
    }
}

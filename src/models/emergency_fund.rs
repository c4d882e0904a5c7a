//! Emergency fund model
//!
//! Single-row savings goal: current balance, a minimum baseline, and a target
//! of so many months of expenses.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// Allowed range for the months-of-expenses target
pub const MONTHS_TARGET_RANGE: std::ops::RangeInclusive<i64> = 1..=12;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyFund {
    pub balance: f64,
    pub baseline: f64,
    pub months_target: i64,
    pub monthly_expenses: f64,
    pub updated_at: String,
}

/// Fields to change; `None` keeps the stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmergencyFundUpdate {
    pub balance: Option<f64>,
    pub baseline: Option<f64>,
    pub months_target: Option<i64>,
    pub monthly_expenses: Option<f64>,
}

impl EmergencyFund {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            balance: row.get("balance")?,
            baseline: row.get("baseline")?,
            months_target: row.get("months_target")?,
            monthly_expenses: row.get("monthly_expenses")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// The fund row (seeded by migrations)
    pub fn get(conn: &Connection) -> DbResult<Self> {
        let result = conn.query_row("SELECT * FROM emergency_fund WHERE id = 1", [], Self::from_row);
        match result {
            Ok(fund) => Ok(fund),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(DbError::NotFound("emergency fund".to_string())),
            Err(e) => Err(e.into()),
        }
    }

    pub fn update(conn: &Connection, data: &EmergencyFundUpdate) -> DbResult<Self> {
        let current = Self::get(conn)?;

        let balance = data.balance.unwrap_or(current.balance);
        let baseline = data.baseline.unwrap_or(current.baseline);
        let monthly_expenses = data.monthly_expenses.unwrap_or(current.monthly_expenses);
        let months_target = data.months_target.unwrap_or(current.months_target);

        for (field, value) in [
            ("balance", balance),
            ("baseline", baseline),
            ("monthly_expenses", monthly_expenses),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(DbError::Validation(format!("{} must be a non-negative number", field)));
            }
        }
        if !MONTHS_TARGET_RANGE.contains(&months_target) {
            return Err(DbError::Validation(format!(
                "months_target must be between {} and {}",
                MONTHS_TARGET_RANGE.start(),
                MONTHS_TARGET_RANGE.end()
            )));
        }

        conn.execute(
            r#"
            UPDATE emergency_fund SET
                balance = ?1,
                baseline = ?2,
                months_target = ?3,
                monthly_expenses = ?4,
                updated_at = datetime('now')
            WHERE id = 1
            "#,
            params![balance, baseline, months_target, monthly_expenses],
        )?;

        Self::get(conn)
    }

    /// Savings goal: the larger of the baseline and the months-of-expenses target
    pub fn target(&self) -> f64 {
        self.baseline.max(self.monthly_expenses * self.months_target as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_seeded_defaults() {
        let db = Database::in_memory().unwrap();
        let conn = db.get_conn().unwrap();

        let fund = EmergencyFund::get(&conn).unwrap();
        assert_eq!(fund.balance, 0.0);
        assert_eq!(fund.months_target, 6);
        assert_eq!(fund.target(), 30600.0);
    }

    #[test]
    fn test_target_uses_baseline_when_larger() {
        let db = Database::in_memory().unwrap();
        let conn = db.get_conn().unwrap();

        let fund = EmergencyFund::update(
            &conn,
            &EmergencyFundUpdate {
                monthly_expenses: Some(300.0),
                months_target: Some(3),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(fund.target(), 2000.0);
        assert_eq!(fund.baseline, 2000.0);
    }

    #[test]
    fn test_update_validation_keeps_row() {
        let db = Database::in_memory().unwrap();
        let conn = db.get_conn().unwrap();

        let negative = EmergencyFundUpdate {
            balance: Some(-5.0),
            ..Default::default()
        };
        assert!(matches!(EmergencyFund::update(&conn, &negative), Err(DbError::Validation(_))));

        let months = EmergencyFundUpdate {
            months_target: Some(13),
            ..Default::default()
        };
        assert!(matches!(EmergencyFund::update(&conn, &months), Err(DbError::Validation(_))));

        assert_eq!(EmergencyFund::get(&conn).unwrap().balance, 0.0);
    }
}

//! Open-month spend
//!
//! Running totals per spend key for the month that has not been closed yet.

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// Amount spent against one key this month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Spend {
    pub key: String,
    pub amount: f64,
}

impl Spend {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            key: row.get("key")?,
            amount: row.get("amount")?,
        })
    }

    /// Add `amount` to a key, creating it at zero first
    pub fn add(conn: &Connection, key: &str, amount: f64) -> DbResult<f64> {
        if !amount.is_finite() {
            return Err(DbError::Validation("amount must be a finite number".to_string()));
        }

        conn.execute(
            r#"
            INSERT INTO finance_spend (key, amount)
            VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET
                amount = amount + excluded.amount,
                updated_at = datetime('now')
            "#,
            params![key, amount],
        )?;

        Self::amount_for(conn, key)
    }

    pub fn amount_for(conn: &Connection, key: &str) -> DbResult<f64> {
        let amount: f64 = conn.query_row(
            "SELECT COALESCE(SUM(amount), 0.0) FROM finance_spend WHERE key = ?1",
            [key],
            |row| row.get(0),
        )?;
        Ok(amount)
    }

    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT key, amount FROM finance_spend ORDER BY key ASC")?;
        let spend = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(spend)
    }

    /// Total over every key, including keys with no budget category
    pub fn total(conn: &Connection) -> DbResult<f64> {
        let total: f64 = conn.query_row("SELECT COALESCE(SUM(amount), 0.0) FROM finance_spend", [], |row| row.get(0))?;
        Ok(total)
    }

    pub fn clear(conn: &Connection) -> DbResult<usize> {
        Ok(conn.execute("DELETE FROM finance_spend", [])?)
    }
}

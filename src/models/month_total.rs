//! Closed month model
//!
//! Spend total recorded when a month is closed.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthTotal {
    pub id: i64,
    pub month: String, // "2025-01"
    pub total: f64,
    pub created_at: String,
}

impl MonthTotal {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            month: row.get("month")?,
            total: row.get("total")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn create(conn: &Connection, month: &str, total: f64) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO finance_history (month, total) VALUES (?1, ?2)",
            params![month, total],
        )?;

        let id = conn.last_insert_rowid();
        conn.query_row("SELECT * FROM finance_history WHERE id = ?1", [id], Self::from_row)
            .optional()?
            .ok_or_else(|| DbError::NotFound(format!("finance history {}", id)))
    }

    /// Closed months in the order they were closed
    pub fn list_all(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM finance_history ORDER BY id ASC")?;
        let months = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(months)
    }
}

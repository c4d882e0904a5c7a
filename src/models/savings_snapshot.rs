//! Savings snapshot model
//!
//! Emergency fund balance recorded on a date.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsSnapshot {
    pub id: i64,
    pub date: String,
    pub balance: f64,
    pub created_at: String,
}

impl SavingsSnapshot {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            balance: row.get("balance")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn create(conn: &Connection, date: &str, balance: f64) -> DbResult<Self> {
        conn.execute(
            "INSERT INTO savings_snapshots (date, balance) VALUES (?1, ?2)",
            params![date, balance],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| DbError::NotFound(format!("savings snapshot {}", id)))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let snapshot = conn
            .query_row("SELECT * FROM savings_snapshots WHERE id = ?1", [id], Self::from_row)
            .optional()?;
        Ok(snapshot)
    }

    /// Most recently recorded snapshot
    pub fn latest(conn: &Connection) -> DbResult<Option<Self>> {
        let snapshot = conn
            .query_row("SELECT * FROM savings_snapshots ORDER BY id DESC LIMIT 1", [], Self::from_row)
            .optional()?;
        Ok(snapshot)
    }

    /// Every snapshot in recording order
    pub fn list_all(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM savings_snapshots ORDER BY id ASC")?;
        let snapshots = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(snapshots)
    }
}

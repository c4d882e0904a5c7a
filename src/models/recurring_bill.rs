//! Recurring bill model
//!
//! Fixed monthly charges that are booked to spend once per month.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// Longest key derived from a bill name
pub const DERIVED_KEY_LEN: usize = 12;

/// A monthly bill booked to a spend key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringBill {
    pub id: i64,
    pub key: String,
    pub name: String,
    pub amount: f64,
    pub created_at: String,
}

/// Data for creating a recurring bill
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecurringBillCreate {
    /// Derived from the name when absent
    pub key: Option<String>,
    pub name: String,
    pub amount: f64,
}

/// "Netflix Premium Plan" -> "netflix-prem"
pub fn derive_key(name: &str) -> String {
    name.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
        .chars()
        .take(DERIVED_KEY_LEN)
        .collect()
}

impl RecurringBill {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            key: row.get("key")?,
            name: row.get("name")?,
            amount: row.get("amount")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn create(conn: &Connection, data: &RecurringBillCreate) -> DbResult<Self> {
        let name = data.name.trim();
        if name.is_empty() {
            return Err(DbError::Validation("bill name must not be empty".to_string()));
        }
        if !data.amount.is_finite() || data.amount == 0.0 {
            return Err(DbError::Validation("bill amount must be a non-zero number".to_string()));
        }

        let key = data
            .key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| derive_key(name));

        conn.execute(
            "INSERT INTO recurring_bills (key, name, amount) VALUES (?1, ?2, ?3)",
            params![key, name, data.amount],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| DbError::NotFound(format!("recurring bill {}", id)))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let bill = conn
            .query_row("SELECT * FROM recurring_bills WHERE id = ?1", [id], Self::from_row)
            .optional()?;
        Ok(bill)
    }

    /// Bills in the order they were added
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM recurring_bills ORDER BY id ASC")?;
        let bills = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(bills)
    }

    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let deleted = conn.execute("DELETE FROM recurring_bills WHERE id = ?1", [id])?;
        Ok(deleted > 0)
    }
}

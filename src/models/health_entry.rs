//! Health entry model
//!
//! Daily weight and sleep readings.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// A weight/sleep reading
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthEntry {
    pub id: i64,
    pub date: String,
    pub weight_kg: f64,
    pub sleep_hours: f64,
    pub created_at: String,
}

/// Data for creating a health entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthEntryCreate {
    pub date: String,
    #[serde(default)]
    pub weight_kg: f64,
    #[serde(default)]
    pub sleep_hours: f64,
}

impl HealthEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            weight_kg: row.get("weight_kg")?,
            sleep_hours: row.get("sleep_hours")?,
            created_at: row.get("created_at")?,
        })
    }

    pub fn create(conn: &Connection, data: &HealthEntryCreate) -> DbResult<Self> {
        if data.weight_kg < 0.0 || data.sleep_hours < 0.0 {
            return Err(DbError::Validation(
                "weight and sleep must not be negative".to_string(),
            ));
        }
        if data.sleep_hours > 24.0 {
            return Err(DbError::Validation(
                "sleep cannot exceed 24 hours".to_string(),
            ));
        }

        conn.execute(
            "INSERT INTO health_entries (date, weight_kg, sleep_hours) VALUES (?1, ?2, ?3)",
            params![data.date, data.weight_kg, data.sleep_hours],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| DbError::NotFound(format!("health entry {}", id)))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let entry = conn
            .query_row("SELECT * FROM health_entries WHERE id = ?1", [id], Self::from_row)
            .optional()?;
        Ok(entry)
    }

    /// Most recently logged first
    pub fn list_recent(conn: &Connection, limit: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM health_entries ORDER BY id DESC LIMIT ?1")?;
        let entries = stmt
            .query_map([limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Every entry in logging order
    pub fn list_all(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM health_entries ORDER BY id ASC")?;
        let entries = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn count(conn: &Connection) -> DbResult<i64> {
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM health_entries", [], |row| row.get(0))?;
        Ok(count)
    }
}

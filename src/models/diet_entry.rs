//! Diet entry model
//!
//! A free-text food item logged on a day, with the estimate taken at log time.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::nutrition::NutritionEstimate;

use super::DietDay;

/// A logged food item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DietEntry {
    pub id: i64,
    pub day_id: i64,
    pub date: String,
    pub name: String,
    pub quantity: Option<f64>,
    pub calories: i64,
    pub protein: f64,
    pub matched_key: Option<String>,
    pub created_at: String,
}

/// Data for creating a diet entry
#[derive(Debug, Clone)]
pub struct DietEntryCreate {
    pub name: String,
    pub quantity: Option<f64>,
    pub estimate: NutritionEstimate,
}

const SELECT_ENTRY: &str = "SELECT e.*, d.date FROM diet_entries e JOIN diet_days d ON d.id = e.day_id";

impl DietEntry {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            day_id: row.get("day_id")?,
            date: row.get("date")?,
            name: row.get("name")?,
            quantity: row.get("quantity")?,
            calories: row.get("calories")?,
            protein: row.get("protein")?,
            matched_key: row.get("matched_key")?,
            created_at: row.get("created_at")?,
        })
    }

    /// Append an entry to a day and fold it into the day's totals.
    ///
    /// A zero or non-finite quantity is stored as absent.
    pub fn create(conn: &Connection, day_id: i64, data: &DietEntryCreate) -> DbResult<Self> {
        let quantity = data.quantity.filter(|q| q.is_finite() && *q != 0.0);

        conn.execute(
            r#"
            INSERT INTO diet_entries (day_id, name, quantity, calories, protein, matched_key)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                day_id,
                data.name,
                quantity,
                data.estimate.calories,
                data.estimate.protein,
                data.estimate.matched_key,
            ],
        )?;

        let id = conn.last_insert_rowid();
        DietDay::add_to_totals(conn, day_id, data.estimate.calories, data.estimate.protein)?;

        Self::get_by_id(conn, id)?.ok_or_else(|| DbError::NotFound(format!("diet entry {}", id)))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let entry = conn
            .query_row(&format!("{} WHERE e.id = ?1", SELECT_ENTRY), [id], Self::from_row)
            .optional()?;
        Ok(entry)
    }

    /// Entries for a day, newest first
    pub fn get_for_day(conn: &Connection, day_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(&format!("{} WHERE e.day_id = ?1 ORDER BY e.id DESC", SELECT_ENTRY))?;
        let entries = stmt
            .query_map([day_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Every entry, grouped by date ascending and in logging order within a date
    pub fn list_all(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(&format!("{} ORDER BY d.date ASC, e.id ASC", SELECT_ENTRY))?;
        let entries = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    pub fn count_for_day(conn: &Connection, day_id: i64) -> DbResult<i64> {
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM diet_entries WHERE day_id = ?1",
            [day_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Delete an entry and rebuild its day's totals.
    /// Returns the day id, or None if the entry did not exist.
    pub fn delete(conn: &Connection, id: i64) -> DbResult<Option<i64>> {
        let Some(entry) = Self::get_by_id(conn, id)? else {
            return Ok(None);
        };

        conn.execute("DELETE FROM diet_entries WHERE id = ?1", [id])?;
        DietDay::recalculate_totals(conn, entry.day_id)?;

        Ok(Some(entry.day_id))
    }
}

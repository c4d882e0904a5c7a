//! Diet day model
//!
//! A logged date with cached calorie and protein totals.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::nutrition::round1;

/// A day container for diet entries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DietDay {
    pub id: i64,
    pub date: String, // ISO date: "2025-01-09"
    pub calories: i64,
    pub protein: f64,
    pub created_at: String,
    pub updated_at: String,
}

impl DietDay {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            date: row.get("date")?,
            calories: row.get("calories")?,
            protein: row.get("protein")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Create a new, empty day
    pub fn create(conn: &Connection, date: &str) -> DbResult<Self> {
        conn.execute("INSERT INTO diet_days (date) VALUES (?1)", [date])?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| DbError::NotFound(format!("diet day {}", id)))
    }

    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let day = conn
            .query_row("SELECT * FROM diet_days WHERE id = ?1", [id], Self::from_row)
            .optional()?;
        Ok(day)
    }

    pub fn get_by_date(conn: &Connection, date: &str) -> DbResult<Option<Self>> {
        let day = conn
            .query_row("SELECT * FROM diet_days WHERE date = ?1", [date], Self::from_row)
            .optional()?;
        Ok(day)
    }

    /// Get or create a day by date
    pub fn get_or_create(conn: &Connection, date: &str) -> DbResult<Self> {
        if let Some(day) = Self::get_by_date(conn, date)? {
            return Ok(day);
        }
        Self::create(conn, date)
    }

    /// List days within an optional inclusive date range, newest first
    pub fn list(conn: &Connection, start_date: Option<&str>, end_date: Option<&str>) -> DbResult<Vec<Self>> {
        let mut sql = String::from("SELECT * FROM diet_days WHERE 1=1");
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(start) = start_date {
            params_vec.push(Box::new(start.to_string()));
            sql.push_str(&format!(" AND date >= ?{}", params_vec.len()));
        }

        if let Some(end) = end_date {
            params_vec.push(Box::new(end.to_string()));
            sql.push_str(&format!(" AND date <= ?{}", params_vec.len()));
        }

        sql.push_str(" ORDER BY date DESC");

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();

        let days = stmt
            .query_map(params_refs.as_slice(), Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(days)
    }

    /// Add one entry's figures to the cached totals
    pub fn add_to_totals(conn: &Connection, id: i64, calories: i64, protein: f64) -> DbResult<()> {
        let day = Self::get_by_id(conn, id)?.ok_or_else(|| DbError::NotFound(format!("diet day {}", id)))?;
        let total = day.calories.checked_add(calories).ok_or_else(|| total_overflow(&day.date))?;

        Self::set_totals(conn, id, total, round1(day.protein + protein))
    }

    /// Rebuild the cached totals from the day's entries, in logging order
    pub fn recalculate_totals(conn: &Connection, id: i64) -> DbResult<(i64, f64)> {
        let mut stmt = conn.prepare(
            "SELECT calories, protein FROM diet_entries WHERE day_id = ?1 ORDER BY id ASC",
        )?;

        let rows = stmt
            .query_map([id], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, f64>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut calories: i64 = 0;
        let mut protein = 0.0_f64;
        for (c, p) in rows {
            calories = calories
                .checked_add(c)
                .ok_or_else(|| DbError::Validation(format!("calorie total for diet day {} is out of range", id)))?;
            protein = round1(protein + p);
        }

        Self::set_totals(conn, id, calories, protein)?;
        Ok((calories, protein))
    }

    fn set_totals(conn: &Connection, id: i64, calories: i64, protein: f64) -> DbResult<()> {
        conn.execute(
            "UPDATE diet_days SET calories = ?1, protein = ?2, updated_at = datetime('now') WHERE id = ?3",
            params![calories, protein, id],
        )?;
        Ok(())
    }

    /// Calories per date for an inclusive date range
    pub fn calories_between(conn: &Connection, start_date: &str, end_date: &str) -> DbResult<Vec<(String, i64)>> {
        let mut stmt = conn.prepare(
            "SELECT date, calories FROM diet_days WHERE date >= ?1 AND date <= ?2 ORDER BY date ASC",
        )?;

        let rows = stmt
            .query_map([start_date, end_date], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(rows)
    }
}

fn total_overflow(date: &str) -> DbError {
    DbError::Validation(format!("calorie total for {} is out of range", date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::Database;

    #[test]
    fn test_get_or_create_is_stable() {
        let db = Database::in_memory().unwrap();
        let conn = db.get_conn().unwrap();

        let first = DietDay::get_or_create(&conn, "2025-03-01").unwrap();
        let second = DietDay::get_or_create(&conn, "2025-03-01").unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(first.calories, 0);
        assert_eq!(first.protein, 0.0);
    }

    #[test]
    fn test_add_to_totals_rounds_protein() {
        let db = Database::in_memory().unwrap();
        let conn = db.get_conn().unwrap();

        let day = DietDay::create(&conn, "2025-03-01").unwrap();
        DietDay::add_to_totals(&conn, day.id, 65, 1.4).unwrap();
        DietDay::add_to_totals(&conn, day.id, 78, 6.0).unwrap();

        let day = DietDay::get_by_id(&conn, day.id).unwrap().unwrap();
        assert_eq!(day.calories, 143);
        assert_eq!(day.protein, 7.4);
    }

    #[test]
    fn test_add_to_totals_rejects_overflow() {
        let db = Database::in_memory().unwrap();
        let conn = db.get_conn().unwrap();

        let day = DietDay::create(&conn, "2025-03-01").unwrap();
        DietDay::add_to_totals(&conn, day.id, i64::MAX - 10, 0.0).unwrap();

        let result = DietDay::add_to_totals(&conn, day.id, 78, 6.0);
        assert!(matches!(result, Err(DbError::Validation(_))));

        let day = DietDay::get_by_id(&conn, day.id).unwrap().unwrap();
        assert_eq!(day.calories, i64::MAX - 10);
    }

    #[test]
    fn test_list_range_newest_first() {
        let db = Database::in_memory().unwrap();
        let conn = db.get_conn().unwrap();

        for date in ["2025-03-01", "2025-03-03", "2025-03-02", "2025-04-01"] {
            DietDay::create(&conn, date).unwrap();
        }

        let days = DietDay::list(&conn, Some("2025-03-01"), Some("2025-03-31")).unwrap();
        let dates: Vec<&str> = days.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-03-03", "2025-03-02", "2025-03-01"]);

        assert_eq!(DietDay::list(&conn, None, None).unwrap().len(), 4);
    }

    #[test]
    fn test_unknown_day_is_none() {
        let db = Database::in_memory().unwrap();
        let conn = db.get_conn().unwrap();
        assert!(DietDay::get_by_date(&conn, "1999-01-01").unwrap().is_none());
        assert!(matches!(
            DietDay::add_to_totals(&conn, 42, 1, 1.0),
            Err(DbError::NotFound(_))
        ));
    }
}

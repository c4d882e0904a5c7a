//! Budget category model
//!
//! Monthly budget per spending category.

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};

/// A spending category with its monthly budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub id: i64,
    pub key: String,
    pub name: String,
    pub budget: f64,
    pub created_at: String,
}

impl BudgetCategory {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            key: row.get("key")?,
            name: row.get("name")?,
            budget: row.get("budget")?,
            created_at: row.get("created_at")?,
        })
    }

    /// All categories in the order they were defined
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM budget_categories ORDER BY id ASC")?;
        let categories = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }

    pub fn get_by_key(conn: &Connection, key: &str) -> DbResult<Option<Self>> {
        let category = conn
            .query_row("SELECT * FROM budget_categories WHERE key = ?1", [key], Self::from_row)
            .optional()?;
        Ok(category)
    }

    /// Change a category's monthly budget
    pub fn set_budget(conn: &Connection, key: &str, budget: f64) -> DbResult<Self> {
        if !budget.is_finite() || budget < 0.0 {
            return Err(DbError::Validation("budget must be a non-negative number".to_string()));
        }

        let updated = conn.execute(
            "UPDATE budget_categories SET budget = ?1 WHERE key = ?2",
            params![budget, key],
        )?;
        if updated == 0 {
            return Err(DbError::NotFound(format!("budget category '{}'", key)));
        }

        Self::get_by_key(conn, key)?.ok_or_else(|| DbError::NotFound(format!("budget category '{}'", key)))
    }

    /// Sum of every category budget
    pub fn total_budget(conn: &Connection) -> DbResult<f64> {
        let total: f64 = conn.query_row(
            "SELECT COALESCE(SUM(budget), 0.0) FROM budget_categories",
            [],
            |row| row.get(0),
        )?;
        Ok(total)
    }
}

//! Key/value application state

use rusqlite::{params, Connection, OptionalExtension};

use crate::db::DbResult;

/// Month ("2025-01") whose recurring bills were last booked
pub const RECURRING_APPLIED_MONTH: &str = "finance.applied_month";

pub struct AppSetting;

impl AppSetting {
    pub fn get(conn: &Connection, key: &str) -> DbResult<Option<String>> {
        let value = conn
            .query_row("SELECT value FROM app_settings WHERE key = ?1", [key], |row| row.get(0))
            .optional()?;
        Ok(value)
    }

    /// Set (upsert) a value
    pub fn set(conn: &Connection, key: &str, value: &str) -> DbResult<()> {
        conn.execute(
            r#"
            INSERT INTO app_settings (key, value)
            VALUES (?1, ?2)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = datetime('now')
            "#,
            params![key, value],
        )?;
        Ok(())
    }
}

//! Health log MCP Tools

use serde::Serialize;

use crate::db::Database;
use crate::models::{HealthEntry, HealthEntryCreate};

use super::{parse_date, DATE_FORMAT};

/// Response for list_health
#[derive(Debug, Serialize)]
pub struct ListHealthResponse {
    pub entries: Vec<HealthEntry>,
    pub total: i64,
    pub limit: i64,
}

/// Log a weight/sleep reading. Missing values are recorded as 0.
pub fn log_health(
    db: &Database,
    date: &str,
    weight_kg: Option<f64>,
    sleep_hours: Option<f64>,
) -> Result<HealthEntry, String> {
    let date = parse_date(date)?.format(DATE_FORMAT).to_string();

    let data = HealthEntryCreate {
        date,
        weight_kg: weight_kg.unwrap_or(0.0),
        sleep_hours: sleep_hours.unwrap_or(0.0),
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let entry = HealthEntry::create(&conn, &data)
        .map_err(|e| format!("Failed to log health entry: {}", e))?;

    tracing::info!(date = %entry.date, weight_kg = entry.weight_kg, sleep_hours = entry.sleep_hours, "Logged health entry");
    Ok(entry)
}

/// Most recent readings first
pub fn list_health(db: &Database, limit: i64) -> Result<ListHealthResponse, String> {
    let limit = limit.clamp(1, 500);
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let entries = HealthEntry::list_recent(&conn, limit)
        .map_err(|e| format!("Failed to list health entries: {}", e))?;
    let total = HealthEntry::count(&conn)
        .map_err(|e| format!("Failed to count health entries: {}", e))?;

    Ok(ListHealthResponse { entries, total, limit })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_health_defaults_missing_to_zero() {
        let db = Database::in_memory().unwrap();
        let entry = log_health(&db, "2025-03-01", Some(72.4), None).unwrap();
        assert_eq!(entry.weight_kg, 72.4);
        assert_eq!(entry.sleep_hours, 0.0);
    }

    #[test]
    fn test_log_health_validation() {
        let db = Database::in_memory().unwrap();
        assert!(log_health(&db, "not-a-date", Some(70.0), Some(8.0)).is_err());
        assert!(log_health(&db, "2025-03-01", Some(-70.0), Some(8.0)).is_err());
    }

    #[test]
    fn test_list_health_newest_first() {
        let db = Database::in_memory().unwrap();
        log_health(&db, "2025-03-01", Some(72.0), Some(7.5)).unwrap();
        log_health(&db, "2025-03-02", Some(71.8), Some(8.0)).unwrap();

        let response = list_health(&db, 0).unwrap();
        assert_eq!(response.limit, 1);
        assert_eq!(response.total, 2);
        assert_eq!(response.entries[0].date, "2025-03-02");
    }
}

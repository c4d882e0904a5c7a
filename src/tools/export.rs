//! CSV export
//!
//! Diet, health, finance and savings history as spreadsheet-friendly CSV. Every field is
//! quoted; an export with no rows is an empty string.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, Terminator, WriterBuilder};
use serde::Serialize;

use crate::db::Database;
use crate::models::{DietDay, DietEntry, HealthEntry, MonthTotal, SavingsSnapshot};

/// Response for export tools
#[derive(Debug, Serialize)]
pub struct ExportResponse {
    pub rows: usize,
    pub path: Option<String>,
    pub csv: Option<String>,
}

fn to_csv(headers: &[&str], rows: &[Vec<String>]) -> Result<String, String> {
    if rows.is_empty() {
        return Ok(String::new());
    }

    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer
        .write_record(headers)
        .map_err(|e| format!("CSV write error: {}", e))?;
    for row in rows {
        writer
            .write_record(row)
            .map_err(|e| format!("CSV write error: {}", e))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| format!("CSV flush error: {}", e))?;
    String::from_utf8(bytes).map_err(|e| format!("CSV encoding error: {}", e))
}

/// Diet rows: per date ascending, a totals row then the date's entries in
/// logging order
pub fn diet_rows(db: &Database) -> Result<Vec<Vec<String>>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let mut days = DietDay::list(&conn, None, None)
        .map_err(|e| format!("Failed to list days: {}", e))?;
    days.reverse();

    let mut by_day: HashMap<i64, Vec<DietEntry>> = HashMap::new();
    for entry in DietEntry::list_all(&conn).map_err(|e| format!("Failed to list entries: {}", e))? {
        by_day.entry(entry.day_id).or_default().push(entry);
    }

    let mut rows = Vec::new();
    for day in days {
        rows.push(vec![
            day.date.clone(),
            String::new(),
            String::new(),
            day.calories.to_string(),
            day.protein.to_string(),
        ]);
        for entry in by_day.remove(&day.id).unwrap_or_default() {
            rows.push(vec![
                day.date.clone(),
                entry.name,
                entry.quantity.map(|q| q.to_string()).unwrap_or_default(),
                entry.calories.to_string(),
                entry.protein.to_string(),
            ]);
        }
    }

    Ok(rows)
}

const DIET_HEADERS: [&str; 5] = ["date", "item", "qty", "calories", "protein"];
const HEALTH_HEADERS: [&str; 3] = ["date", "weight", "sleep"];
const FINANCE_HEADERS: [&str; 2] = ["month", "total"];
const SAVINGS_HEADERS: [&str; 2] = ["date", "balance"];

/// Diet history as CSV
pub fn diet_csv(db: &Database) -> Result<String, String> {
    to_csv(&DIET_HEADERS, &diet_rows(db)?)
}

/// Health rows in logging order
pub fn health_rows(db: &Database) -> Result<Vec<Vec<String>>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let entries = HealthEntry::list_all(&conn)
        .map_err(|e| format!("Failed to list health entries: {}", e))?;

    Ok(entries
        .into_iter()
        .map(|e| vec![e.date, e.weight_kg.to_string(), e.sleep_hours.to_string()])
        .collect())
}

/// Health history as CSV
pub fn health_csv(db: &Database) -> Result<String, String> {
    to_csv(&HEALTH_HEADERS, &health_rows(db)?)
}

/// Closed months in the order they were closed
pub fn finance_rows(db: &Database) -> Result<Vec<Vec<String>>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let months = MonthTotal::list_all(&conn).map_err(|e| format!("Failed to list finance history: {}", e))?;

    Ok(months
        .into_iter()
        .map(|m| vec![m.month, m.total.to_string()])
        .collect())
}

/// Finance history as CSV
pub fn finance_csv(db: &Database) -> Result<String, String> {
    to_csv(&FINANCE_HEADERS, &finance_rows(db)?)
}

/// Savings snapshots in recording order
pub fn savings_rows(db: &Database) -> Result<Vec<Vec<String>>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let snapshots = SavingsSnapshot::list_all(&conn).map_err(|e| format!("Failed to list snapshots: {}", e))?;

    Ok(snapshots
        .into_iter()
        .map(|s| vec![s.date, s.balance.to_string()])
        .collect())
}

/// Savings snapshots as CSV
pub fn savings_csv(db: &Database) -> Result<String, String> {
    to_csv(&SAVINGS_HEADERS, &savings_rows(db)?)
}

/// Write CSV to `path`, creating parent directories
pub fn write_csv_file(path: &Path, contents: &str) -> Result<PathBuf, String> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create {}: {}", parent.display(), e))?;
    }
    std::fs::write(path, contents).map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
    Ok(path.to_path_buf())
}

/// Export diet history, to `path` when given
pub fn export_diet(db: &Database, path: Option<&str>) -> Result<ExportResponse, String> {
    let rows = diet_rows(db)?;
    export(to_csv(&DIET_HEADERS, &rows)?, rows.len(), path)
}

/// Export health history, to `path` when given
pub fn export_health(db: &Database, path: Option<&str>) -> Result<ExportResponse, String> {
    let rows = health_rows(db)?;
    export(to_csv(&HEALTH_HEADERS, &rows)?, rows.len(), path)
}

/// Export finance history, to `path` when given
pub fn export_finance(db: &Database, path: Option<&str>) -> Result<ExportResponse, String> {
    let rows = finance_rows(db)?;
    export(to_csv(&FINANCE_HEADERS, &rows)?, rows.len(), path)
}

/// Export savings snapshots, to `path` when given
pub fn export_savings(db: &Database, path: Option<&str>) -> Result<ExportResponse, String> {
    let rows = savings_rows(db)?;
    export(to_csv(&SAVINGS_HEADERS, &rows)?, rows.len(), path)
}

/// Build an export response, writing to `path` when given and inlining the
/// CSV otherwise
fn export(contents: String, rows: usize, path: Option<&str>) -> Result<ExportResponse, String> {
    match path {
        Some(p) => {
            let written = write_csv_file(Path::new(p), &contents)?;
            tracing::info!(path = %written.display(), rows, "Exported CSV");
            Ok(ExportResponse {
                rows,
                path: Some(written.display().to_string()),
                csv: None,
            })
        }
        None => Ok(ExportResponse {
            rows,
            path: None,
            csv: Some(contents),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nutrition::default_catalog;
    use crate::models::EmergencyFundUpdate;
    use crate::tools::{diet, finance, health, savings};

    #[test]
    fn test_empty_exports_are_empty() {
        let db = Database::in_memory().unwrap();
        assert_eq!(diet_csv(&db).unwrap(), "");
        assert_eq!(health_csv(&db).unwrap(), "");
        assert_eq!(finance_csv(&db).unwrap(), "");
        assert_eq!(savings_csv(&db).unwrap(), "");
    }

    #[test]
    fn test_diet_csv_layout() {
        let db = Database::in_memory().unwrap();
        diet::log_food(&db, default_catalog(), "2025-03-02", "apple", None).unwrap();
        diet::log_food(&db, default_catalog(), "2025-03-01", "egg", Some(3.0)).unwrap();
        diet::log_food(&db, default_catalog(), "2025-03-01", "rice cooked", Some(50.0)).unwrap();

        let csv = diet_csv(&db).unwrap();
        let expected = concat!(
            "\"date\",\"item\",\"qty\",\"calories\",\"protein\"\n",
            "\"2025-03-01\",\"\",\"\",\"299\",\"19.4\"\n",
            "\"2025-03-01\",\"egg\",\"3\",\"234\",\"18\"\n",
            "\"2025-03-01\",\"rice cooked\",\"50\",\"65\",\"1.4\"\n",
            "\"2025-03-02\",\"\",\"\",\"95\",\"0.5\"\n",
            "\"2025-03-02\",\"apple\",\"\",\"95\",\"0.5\"\n",
        );
        assert_eq!(csv, expected);
    }

    #[test]
    fn test_quotes_are_doubled() {
        let db = Database::in_memory().unwrap();
        diet::log_food(&db, default_catalog(), "2025-03-01", "6\" sub", None).unwrap();

        let csv = diet_csv(&db).unwrap();
        assert!(csv.contains("\"6\"\" sub\""));
    }

    #[test]
    fn test_health_csv() {
        let db = Database::in_memory().unwrap();
        health::log_health(&db, "2025-03-01", Some(72.5), Some(7.0)).unwrap();

        let csv = health_csv(&db).unwrap();
        assert_eq!(csv, "\"date\",\"weight\",\"sleep\"\n\"2025-03-01\",\"72.5\",\"7\"\n");
    }

    #[test]
    fn test_finance_csv() {
        let db = Database::in_memory().unwrap();
        finance::add_spend(&db, "food", 120.25).unwrap();
        finance::close_month(&db, "2025-01").unwrap();
        finance::add_spend(&db, "rent", 800.0).unwrap();
        finance::close_month(&db, "2025-02").unwrap();

        let csv = finance_csv(&db).unwrap();
        assert_eq!(
            csv,
            "\"month\",\"total\"\n\"2025-01\",\"120.25\"\n\"2025-02\",\"800\"\n"
        );
        assert_eq!(export_finance(&db, None).unwrap().rows, 2);
    }

    #[test]
    fn test_savings_csv() {
        let db = Database::in_memory().unwrap();
        let update = EmergencyFundUpdate {
            balance: Some(1500.5),
            ..Default::default()
        };
        savings::update_fund(&db, &update).unwrap();
        savings::log_snapshot(&db, "2025-03-01").unwrap();

        let csv = savings_csv(&db).unwrap();
        assert_eq!(csv, "\"date\",\"balance\"\n\"2025-03-01\",\"1500.5\"\n");
        assert_eq!(export_savings(&db, None).unwrap().rows, 1);
    }

    #[test]
    fn test_export_diet_counts_rows() {
        let db = Database::in_memory().unwrap();
        diet::log_food(&db, default_catalog(), "2025-03-01", "egg", None).unwrap();

        let response = export_diet(&db, None).unwrap();
        assert_eq!(response.rows, 2);
        assert!(response.csv.unwrap().starts_with("\"date\""));
        assert_eq!(export_health(&db, None).unwrap().rows, 0);
    }

    #[test]
    fn test_export_writes_file() {
        let dir = std::env::temp_dir().join(format!("lifehub-export-test-{}", std::process::id()));
        let path = dir.join("nested").join("diet.csv");

        let response = export("\"a\"\n".to_string(), 1, path.to_str()).unwrap();
        assert!(response.csv.is_none());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "\"a\"\n");

        let inline = export("x".to_string(), 0, None).unwrap();
        assert_eq!(inline.csv.as_deref(), Some("x"));

        std::fs::remove_dir_all(&dir).ok();
    }
}

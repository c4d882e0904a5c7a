//! Diet diary MCP Tools
//!
//! Tools for logging free-text food items against a date and reading back
//! daily totals and calorie trends.

use std::collections::HashMap;

use chrono::Duration;
use serde::Serialize;

use crate::db::{Database, DbError};
use crate::models::{DietDay, DietEntry, DietEntryCreate};
use crate::nutrition::{self, FoodCatalog};

use super::{parse_date, DATE_FORMAT};

/// Longest trend window served
pub const MAX_TREND_DAYS: i64 = 366;

/// Response for log_food
#[derive(Debug, Serialize)]
pub struct LogFoodResponse {
    pub entry: DietEntry,
    pub day_calories: i64,
    pub day_protein: f64,
}

/// Day with entries for detailed view
#[derive(Debug, Serialize)]
pub struct DietDayDetail {
    pub date: String,
    pub calories: i64,
    pub protein: f64,
    /// Newest first
    pub entries: Vec<DietEntry>,
}

/// Day summary for listing
#[derive(Debug, Serialize)]
pub struct DietDaySummary {
    pub date: String,
    pub calories: i64,
    pub protein: f64,
    pub entry_count: i64,
}

/// Response for list_diet_days
#[derive(Debug, Serialize)]
pub struct ListDietDaysResponse {
    pub days: Vec<DietDaySummary>,
    pub total: usize,
}

/// Response for delete_diet_entry
#[derive(Debug, Serialize)]
pub struct DeleteDietEntryResponse {
    pub success: bool,
    pub deleted_id: i64,
    pub date: String,
    pub day_calories: i64,
    pub day_protein: f64,
}

/// One point of the calorie chart
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub date: String,
    /// "MM-DD"
    pub label: String,
    pub calories: i64,
}

/// Response for calorie_trend
#[derive(Debug, Serialize)]
pub struct CalorieTrendResponse {
    pub start_date: String,
    pub end_date: String,
    pub points: Vec<TrendPoint>,
    pub average_calories: f64,
}

/// Estimate a free-text item and append it to the date's diary
pub fn log_food(
    db: &Database,
    catalog: &FoodCatalog,
    date: &str,
    item: &str,
    quantity: Option<f64>,
) -> Result<LogFoodResponse, String> {
    let date = parse_date(date)?.format(DATE_FORMAT).to_string();

    let item = item.trim();
    if item.is_empty() {
        return Err("Food item must not be empty".to_string());
    }

    let estimate = nutrition::estimate(catalog, item, quantity);
    if estimate.calories == i64::MAX || estimate.calories == i64::MIN || !estimate.protein.is_finite() {
        return Err(format!("Quantity {:?} is too large to estimate", quantity.unwrap_or_default()));
    }
    if !estimate.is_resolved() {
        tracing::info!(item, "Logging unrecognised food item with zero estimate");
    }

    let data = DietEntryCreate {
        name: item.to_string(),
        quantity,
        estimate,
    };

    let (entry, day) = db
        .with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let day = DietDay::get_or_create(&tx, &date)?;
            let entry = DietEntry::create(&tx, day.id, &data)?;
            let day = DietDay::get_by_id(&tx, day.id)?.unwrap_or(day);
            tx.commit()?;
            Ok((entry, day))
        })
        .map_err(|e| format!("Failed to log food: {}", e))?;

    tracing::info!(
        date = %entry.date,
        item = %entry.name,
        calories = entry.calories,
        matched = ?entry.matched_key,
        "Logged food"
    );

    Ok(LogFoodResponse {
        entry,
        day_calories: day.calories,
        day_protein: day.protein,
    })
}

/// Totals and entries for a date. A date with nothing logged reads as zero.
pub fn get_day(db: &Database, date: &str) -> Result<DietDayDetail, String> {
    let date = parse_date(date)?.format(DATE_FORMAT).to_string();
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let day = DietDay::get_by_date(&conn, &date)
        .map_err(|e| format!("Failed to get day: {}", e))?;

    match day {
        Some(day) => {
            let entries = DietEntry::get_for_day(&conn, day.id)
                .map_err(|e| format!("Failed to get entries: {}", e))?;
            Ok(DietDayDetail {
                date: day.date,
                calories: day.calories,
                protein: day.protein,
                entries,
            })
        }
        None => Ok(DietDayDetail {
            date,
            calories: 0,
            protein: 0.0,
            entries: Vec::new(),
        }),
    }
}

/// List logged days, newest first
pub fn list_days(
    db: &Database,
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<ListDietDaysResponse, String> {
    let start = start_date.map(parse_date).transpose()?.map(|d| d.format(DATE_FORMAT).to_string());
    let end = end_date.map(parse_date).transpose()?.map(|d| d.format(DATE_FORMAT).to_string());

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let days = DietDay::list(&conn, start.as_deref(), end.as_deref())
        .map_err(|e| format!("Failed to list days: {}", e))?;

    let mut summaries = Vec::with_capacity(days.len());
    for day in days {
        let entry_count = DietEntry::count_for_day(&conn, day.id)
            .map_err(|e| format!("Failed to count entries: {}", e))?;
        summaries.push(DietDaySummary {
            date: day.date,
            calories: day.calories,
            protein: day.protein,
            entry_count,
        });
    }

    let total = summaries.len();
    Ok(ListDietDaysResponse { days: summaries, total })
}

/// Delete an entry; the day's totals are rebuilt from what remains
pub fn delete_entry(db: &Database, id: i64) -> Result<Option<DeleteDietEntryResponse>, String> {
    let day = db
        .with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let Some(day_id) = DietEntry::delete(&tx, id)? else {
                return Ok(None);
            };
            let day = DietDay::get_by_id(&tx, day_id)?
                .ok_or_else(|| DbError::NotFound(format!("diet day for entry {}", id)))?;
            tx.commit()?;
            Ok(Some(day))
        })
        .map_err(|e| format!("Failed to delete entry: {}", e))?;

    let Some(day) = day else {
        return Ok(None);
    };

    tracing::info!(id, date = %day.date, "Deleted diet entry");

    Ok(Some(DeleteDietEntryResponse {
        success: true,
        deleted_id: id,
        date: day.date,
        day_calories: day.calories,
        day_protein: day.protein,
    }))
}

/// Daily calories for the `days` days ending at `end_date`, oldest first.
/// Days with nothing logged count as zero.
pub fn calorie_trend(db: &Database, end_date: &str, days: i64) -> Result<CalorieTrendResponse, String> {
    let end = parse_date(end_date)?;
    let days = days.clamp(1, MAX_TREND_DAYS);
    let start = end - Duration::days(days - 1);

    let start_str = start.format(DATE_FORMAT).to_string();
    let end_str = end.format(DATE_FORMAT).to_string();

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let logged: HashMap<String, i64> = DietDay::calories_between(&conn, &start_str, &end_str)
        .map_err(|e| format!("Failed to load calories: {}", e))?
        .into_iter()
        .collect();

    let points: Vec<TrendPoint> = start
        .iter_days()
        .take(days as usize)
        .map(|d| {
            let date = d.format(DATE_FORMAT).to_string();
            TrendPoint {
                calories: logged.get(&date).copied().unwrap_or(0),
                label: d.format("%m-%d").to_string(),
                date,
            }
        })
        .collect();

    let total: f64 = points.iter().map(|p| p.calories as f64).sum();
    let average_calories = nutrition::round1(total / points.len() as f64);

    Ok(CalorieTrendResponse {
        start_date: start_str,
        end_date: end_str,
        points,
        average_calories,
    })
}

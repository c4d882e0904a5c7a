//! LifeHub Tools module
//!
//! MCP tool implementations for LifeHub.

pub mod diet;
pub mod export;
pub mod finance;
pub mod food;
pub mod health;
pub mod savings;
pub mod status;
pub mod trends;

use chrono::NaiveDate;

use crate::nutrition::round_half_up;

/// Date format used for every stored date
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Month format ("2025-01")
pub const MONTH_FORMAT: &str = "%Y-%m";

/// Parse an ISO date ("2025-01-09")
pub fn parse_date(date: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
        .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", date))
}

/// Today's date in local time
pub fn today() -> String {
    chrono::Local::now().date_naive().format(DATE_FORMAT).to_string()
}

/// Validate and normalise a month ("2025-01")
pub fn parse_month(month: &str) -> Result<String, String> {
    NaiveDate::parse_from_str(&format!("{}-01", month.trim()), DATE_FORMAT)
        .map(|d| d.format(MONTH_FORMAT).to_string())
        .map_err(|_| format!("Invalid month '{}', expected YYYY-MM", month))
}

/// Current month in local time
pub fn this_month() -> String {
    chrono::Local::now().date_naive().format(MONTH_FORMAT).to_string()
}

/// Whole percent of `value` over `whole`, rounded half up; 0 when `whole`
/// is not positive
pub fn percent(value: f64, whole: f64) -> i64 {
    if whole <= 0.0 || !value.is_finite() {
        return 0;
    }
    round_half_up(value / whole * 100.0) as i64
}

/// Progress bar fill, 0 to 100. An empty goal is full once anything is in it.
pub fn progress_percent(value: f64, whole: f64) -> i64 {
    if whole <= 0.0 {
        return if value > 0.0 { 100 } else { 0 };
    }
    percent(value, whole).clamp(0, 100)
}

/// Round money to whole cents
pub fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

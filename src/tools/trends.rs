//! Trend series MCP Tools
//!
//! Chart-ready `{name, value}` series over the recorded history.

use rmcp::schemars;
use serde::{Deserialize, Serialize};

use crate::db::Database;
use crate::models::{DietDay, HealthEntry, MonthTotal, SavingsSnapshot};

/// Which history to chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TrendSeries {
    /// Spend total per closed month
    Spend,
    /// Emergency fund snapshots
    Savings,
    /// Body weight per health entry
    Weight,
    /// Sleep hours per health entry
    Sleep,
    /// Calories per logged day
    Calories,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    /// Month or date
    pub name: String,
    pub value: f64,
}

/// Response for get_trend
#[derive(Debug, Serialize)]
pub struct TrendResponse {
    pub series: TrendSeries,
    pub points: Vec<SeriesPoint>,
}

fn point(name: String, value: f64) -> SeriesPoint {
    SeriesPoint { name, value }
}

/// Every recorded point of `series`, oldest first
pub fn get_trend(db: &Database, series: TrendSeries) -> Result<TrendResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let points = match series {
        TrendSeries::Spend => MonthTotal::list_all(&conn)
            .map_err(|e| format!("Failed to list finance history: {}", e))?
            .into_iter()
            .map(|m| point(m.month, m.total))
            .collect(),
        TrendSeries::Savings => SavingsSnapshot::list_all(&conn)
            .map_err(|e| format!("Failed to list snapshots: {}", e))?
            .into_iter()
            .map(|s| point(s.date, s.balance))
            .collect(),
        TrendSeries::Weight | TrendSeries::Sleep => HealthEntry::list_all(&conn)
            .map_err(|e| format!("Failed to list health entries: {}", e))?
            .into_iter()
            .map(|h| {
                let value = if series == TrendSeries::Weight { h.weight_kg } else { h.sleep_hours };
                point(h.date, value)
            })
            .collect(),
        TrendSeries::Calories => {
            let mut days = DietDay::list(&conn, None, None).map_err(|e| format!("Failed to list days: {}", e))?;
            days.reverse();
            days.into_iter().map(|d| point(d.date, d.calories as f64)).collect()
        }
    };

    Ok(TrendResponse { series, points })
}

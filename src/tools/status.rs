//! LifeHub Status Tool
//!
//! Provides runtime status information about the LifeHub service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Diet logging instructions for AI assistants
pub const DIET_INSTRUCTIONS: &str = r#"
# LifeHub Diet Logging Instructions

## Overview

Food is logged as free text. LifeHub matches the text against its built-in
food catalog and estimates calories and protein from the matched food.

## Quantities

The meaning of `quantity` depends on the matched food:

| Catalog unit | quantity means | omitted means |
|--------------|----------------|---------------|
| `1`          | pieces         | 1 piece       |
| `100g`       | grams          | 100 g         |
| `100ml`      | milliliters    | 100 ml        |

Use `list_food_catalog` to see each food's unit.

## Workflow

1. Optional: `match_food(query: "chicken")` to preview which food the text resolves to
2. Optional: `estimate_food(item: "chicken breast", quantity: 200)` to preview numbers
3. `log_food(date: "2025-01-09", item: "chicken breast", quantity: 200)`
4. `get_diet_day(date: "2025-01-09")` for the day's totals and entries

## Unrecognised Items

If nothing in the catalog resembles the text, the entry is still logged with
0 kcal and 0 g protein and `matched_key: null`. Tell the user the item was not
recognised instead of retrying.

## Corrections

`delete_diet_entry(id)` removes an entry and recalculates the day's totals.
Log the corrected item afterwards.

## Trends and Export

- `calorie_trend(end_date, days)` returns one point per day, missing days as 0
- `export_diet_csv` / `export_health_csv` return CSV, or write it when `path` is given

## Notes

- Dates use ISO format: YYYY-MM-DD
- Protein is rounded to one decimal, calories to whole numbers
"#;

/// Runtime status of the LifeHub service
#[derive(Debug, Clone, Serialize)]
pub struct LifeHubStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Catalog information
    pub catalog_foods: usize,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self, catalog_foods: usize) -> LifeHubStatus {
        let build_info = BuildInfo::current();

        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        LifeHubStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            catalog_foods,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

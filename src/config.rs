//! Runtime configuration
//!
//! Read from environment variables:
//! - `LIFEHUB_DATABASE_PATH`: SQLite file (default `<project>/data/lifehub.db`)
//! - `LIFEHUB_TREND_DAYS`: default calorie trend window (default 14)

use std::path::PathBuf;

/// Default calorie trend window, in days
pub const DEFAULT_TREND_DAYS: i64 = 14;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_path: PathBuf,
    pub trend_days: i64,
}

impl Config {
    pub fn from_env() -> Self {
        let database_path = std::env::var("LIFEHUB_DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_database_path());

        let trend_days = std::env::var("LIFEHUB_TREND_DAYS")
            .ok()
            .and_then(|v| parse_trend_days(&v))
            .unwrap_or(DEFAULT_TREND_DAYS);

        Self {
            database_path,
            trend_days,
        }
    }
}

fn parse_trend_days(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok().filter(|d| *d > 0)
}

/// `data/lifehub.db` next to the project root when run from `target/`,
/// otherwise next to the executable
pub fn default_database_path() -> PathBuf {
    let mut path = std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|p| p.to_path_buf()))
        .unwrap_or_else(|| PathBuf::from("."));

    // Go up from target/release or target/debug to project root
    if path.ends_with("release") || path.ends_with("debug") {
        if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
            path = grandparent.to_path_buf();
        }
    }

    path.push("data");
    path.push("lifehub.db");
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trend_days() {
        assert_eq!(parse_trend_days("30"), Some(30));
        assert_eq!(parse_trend_days(" 7 "), Some(7));
        assert_eq!(parse_trend_days("0"), None);
        assert_eq!(parse_trend_days("two weeks"), None);
    }

    #[test]
    fn test_default_database_path_file_name() {
        let path = default_database_path();
        assert!(path.ends_with("data/lifehub.db"));
    }
}

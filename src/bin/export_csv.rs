//! Utility to export the diet diary, health log, finance history and
//! savings snapshots as CSV files
//!
//! Usage: export_csv [OUTPUT_DIR]

use std::path::PathBuf;

use lifehub::config::Config;
use lifehub::tools::export;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));

    let config = Config::from_env();
    println!("Database path: {}", config.database_path.display());

    let database = lifehub::db::Database::new(&config.database_path)?;
    database.with_conn(|conn| {
        lifehub::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let diet_path = out_dir.join("diet.csv");
    let diet = export::export_diet(&database, diet_path.to_str())?;
    println!("Diet: {} rows -> {}", diet.rows, diet_path.display());

    let health_path = out_dir.join("health.csv");
    let health = export::export_health(&database, health_path.to_str())?;
    println!("Health: {} rows -> {}", health.rows, health_path.display());

    let finance_path = out_dir.join("finance.csv");
    let finance = export::export_finance(&database, finance_path.to_str())?;
    println!("Finance: {} rows -> {}", finance.rows, finance_path.display());

    let savings_path = out_dir.join("savings.csv");
    let savings = export::export_savings(&database, savings_path.to_str())?;
    println!("Savings: {} rows -> {}", savings.rows, savings_path.display());

    Ok(())
}

//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::{Connection, OptionalExtension};

use super::connection::DbResult;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
        tracing::info!(version = 1, "Applied schema migration");
    }

    if current_version < 2 {
        migrate_v2(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (2)", [])?;
        tracing::info!(version = 2, "Applied schema migration");
    }

    Ok(())
}

/// Migration v1: diet diary and health log
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- DIET DAYS
        -- One row per logged date with cached totals
        -- ============================================
        CREATE TABLE diet_days (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL UNIQUE,           -- ISO date: "2025-01-09"
            calories INTEGER NOT NULL DEFAULT 0,
            protein REAL NOT NULL DEFAULT 0,     -- grams, one decimal
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- DIET ENTRIES
        -- Free-text items with their estimate at log time
        -- ============================================
        CREATE TABLE diet_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            day_id INTEGER NOT NULL REFERENCES diet_days(id) ON DELETE CASCADE,
            name TEXT NOT NULL,                  -- what the user typed
            quantity REAL,                       -- pcs, g or ml; NULL = reference serving
            calories INTEGER NOT NULL,
            protein REAL NOT NULL,
            matched_key TEXT,                    -- catalog key, NULL when unresolved
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_diet_entries_day ON diet_entries(day_id);

        -- ============================================
        -- HEALTH ENTRIES
        -- Weight and sleep log
        -- ============================================
        CREATE TABLE health_entries (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            weight_kg REAL NOT NULL DEFAULT 0,
            sleep_hours REAL NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_health_entries_date ON health_entries(date);
        "#,
    )?;

    Ok(())
}

/// Migration v2: monthly budget, recurring bills and emergency fund
fn migrate_v2(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- BUDGET CATEGORIES
        -- Monthly budget per spending category
        -- ============================================
        CREATE TABLE budget_categories (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            key TEXT NOT NULL UNIQUE,            -- "rent", "food"
            name TEXT NOT NULL,
            budget REAL NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        INSERT INTO budget_categories (key, name, budget) VALUES
            ('rent', 'Rent', 800),
            ('food', 'Food/Grocery', 250),
            ('phone', 'Phone Bill', 73.79),
            ('transport', 'Transport', 80),
            ('gym', 'Gym', 39),
            ('restaurants', 'Restaurants', 60),
            ('other', 'Other', 100);

        -- ============================================
        -- FINANCE SPEND
        -- Running spend of the open month, per key.
        -- Keys usually name a category but need not.
        -- ============================================
        CREATE TABLE finance_spend (
            key TEXT PRIMARY KEY,
            amount REAL NOT NULL DEFAULT 0,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- RECURRING BILLS
        -- Added to spend once per month
        -- ============================================
        CREATE TABLE recurring_bills (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            key TEXT NOT NULL,                   -- spend key the bill is booked to
            name TEXT NOT NULL,
            amount REAL NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        INSERT INTO recurring_bills (key, name, amount) VALUES
            ('rent', 'Rent', 380),
            ('phone', 'Vodafone Phone', 73.79),
            ('gym', 'Gym', 39);

        -- ============================================
        -- FINANCE HISTORY
        -- Spend total of each closed month
        -- ============================================
        CREATE TABLE finance_history (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            month TEXT NOT NULL,                 -- "2025-01"
            total REAL NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- APP SETTINGS
        -- Small key/value state (recurring applied month)
        -- ============================================
        CREATE TABLE app_settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- ============================================
        -- EMERGENCY FUND (single row)
        -- ============================================
        CREATE TABLE emergency_fund (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            balance REAL NOT NULL DEFAULT 0,
            baseline REAL NOT NULL DEFAULT 2000,
            months_target INTEGER NOT NULL DEFAULT 6,
            monthly_expenses REAL NOT NULL DEFAULT 5100,
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        INSERT INTO emergency_fund (id) VALUES (1);

        -- ============================================
        -- SAVINGS SNAPSHOTS
        -- Emergency fund balance over time
        -- ============================================
        CREATE TABLE savings_snapshots (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            date TEXT NOT NULL,
            balance REAL NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: Option<i32> = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .optional()
        .unwrap_or(None);
    Ok(version.unwrap_or(0))
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}

//! LifeHub MCP Server Implementation
//!
//! Implements the MCP server with all LifeHub tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::Database;
use crate::nutrition::FoodCatalog;
use crate::tools::status::StatusTracker;
use crate::models::EmergencyFundUpdate;
use crate::tools::trends::{self, TrendSeries};
use crate::tools::{diet, export, finance, food, health, savings};

/// LifeHub MCP Service
#[derive(Clone)]
pub struct LifeHubService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    catalog: &'static FoodCatalog,
    trend_days: i64,
    tool_router: ToolRouter<LifeHubService>,
}

impl LifeHubService {
    pub fn new(database_path: PathBuf, database: Database, catalog: &'static FoodCatalog, trend_days: i64) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            catalog,
            trend_days,
            tool_router: Self::tool_router(),
        }
    }
}

/// Pretty JSON tool result
fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Food Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListFoodCatalogParams {
    /// Only foods whose name contains this text (optional)
    pub filter: Option<String>,
    /// Only foods with this reference unit: "1"/"pcs", "100g"/"g" or "100ml"/"ml" (optional)
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MatchFoodParams {
    /// Free-text food description
    pub query: String,
    /// Number of ranked candidates to include (default 5)
    #[serde(default = "default_candidate_limit")]
    pub limit: usize,
}

fn default_candidate_limit() -> usize { 5 }

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct EstimateFoodParams {
    /// Free-text food description, e.g. "chicken breast"
    pub item: String,
    /// Pieces, grams or milliliters depending on the food (optional)
    pub quantity: Option<f64>,
}

// ============================================================================
// Diet Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogFoodParams {
    /// Date in YYYY-MM-DD format (default today)
    pub date: Option<String>,
    /// Free-text food description
    pub item: String,
    /// Pieces, grams or milliliters depending on the food (optional)
    pub quantity: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetDietDayParams {
    /// Date in YYYY-MM-DD format (default today)
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListDietDaysParams {
    /// Inclusive start date (optional)
    pub start_date: Option<String>,
    /// Inclusive end date (optional)
    pub end_date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteDietEntryParams {
    /// Diet entry ID
    pub id: i64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CalorieTrendParams {
    /// Last day of the window, YYYY-MM-DD (default today)
    pub end_date: Option<String>,
    /// Window length in days (default from configuration, usually 14)
    pub days: Option<i64>,
}

// ============================================================================
// Health Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogHealthParams {
    /// Date in YYYY-MM-DD format (default today)
    pub date: Option<String>,
    /// Body weight in kg (default 0)
    pub weight_kg: Option<f64>,
    /// Hours slept (default 0)
    pub sleep_hours: Option<f64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ListHealthParams {
    /// Maximum entries to return (default 30)
    #[serde(default = "default_health_limit")]
    pub limit: i64,
}

fn default_health_limit() -> i64 { 30 }

// ============================================================================
// Finance Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct MonthParams {
    /// Month in YYYY-MM format (default this month)
    pub month: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddSpendParams {
    /// Budget category key, e.g. "food"
    pub key: String,
    /// Amount to add; negative amounts correct earlier spend
    pub amount: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetCategoryBudgetParams {
    /// Budget category key
    pub key: String,
    /// Monthly budget for the category
    pub budget: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddRecurringBillParams {
    /// Bill name, e.g. "Vodafone Phone"
    pub name: String,
    /// Category key the bill is booked to (default derived from the name)
    pub key: Option<String>,
    /// Amount booked each month
    pub amount: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct DeleteRecurringBillParams {
    /// Recurring bill ID
    pub id: i64,
}

// ============================================================================
// Savings Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FundStatusParams {
    /// Today's date in YYYY-MM-DD format (default today)
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct UpdateEmergencyFundParams {
    /// Current balance (optional)
    pub balance: Option<f64>,
    /// Minimum target regardless of expenses (optional)
    pub baseline: Option<f64>,
    /// Monthly expenses the fund should cover (optional)
    pub monthly_expenses: Option<f64>,
    /// Months of expenses to cover, 1 to 12 (optional)
    pub months_target: Option<i64>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogSavingsSnapshotParams {
    /// Date in YYYY-MM-DD format (default today)
    pub date: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct GetTrendParams {
    /// One of "spend", "savings", "weight", "sleep" or "calories"
    pub series: TrendSeries,
}

// ============================================================================
// Export Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ExportCsvParams {
    /// File to write; the CSV is returned inline when omitted
    pub path: Option<String>,
}

// ============================================================================
// Tool Implementations
// ============================================================================

#[tool_router]
impl LifeHubService {
    // --- Status ---

    #[tool(description = "Get the current status of the LifeHub service including build info, database status, and process information")]
    async fn lifehub_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(self.catalog.len());
        json_result(&status)
    }

    #[tool(description = "Get step-by-step instructions for logging food. Call this when starting a food logging session or when unsure how quantities work.")]
    fn diet_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::DIET_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(DIET_INSTRUCTIONS)]))
    }

    // --- Food Catalog ---

    #[tool(description = "List the built-in food catalog with calories and protein per reference serving (1 piece, 100g or 100ml)")]
    fn list_food_catalog(&self, Parameters(p): Parameters<ListFoodCatalogParams>) -> Result<CallToolResult, McpError> {
        let result = food::list_catalog(self.catalog, p.filter.as_deref(), p.unit.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Show which catalog food a free-text description resolves to, with the closest ranked candidates")]
    fn match_food(&self, Parameters(p): Parameters<MatchFoodParams>) -> Result<CallToolResult, McpError> {
        json_result(&food::match_food(self.catalog, &p.query, p.limit))
    }

    #[tool(description = "Estimate calories and protein for a free-text food and quantity without logging it")]
    fn estimate_food(&self, Parameters(p): Parameters<EstimateFoodParams>) -> Result<CallToolResult, McpError> {
        json_result(&food::estimate_food(self.catalog, &p.item, p.quantity))
    }

    // --- Diet Diary ---

    #[tool(description = "Log a free-text food item for a date. Estimates calories/protein and updates the day's totals. Unrecognised items are logged with zero values.")]
    fn log_food(&self, Parameters(p): Parameters<LogFoodParams>) -> Result<CallToolResult, McpError> {
        let date = p.date.unwrap_or_else(crate::tools::today);
        let result = diet::log_food(&self.database, self.catalog, &date, &p.item, p.quantity)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a day's calorie/protein totals and logged entries (newest first)")]
    fn get_diet_day(&self, Parameters(p): Parameters<GetDietDayParams>) -> Result<CallToolResult, McpError> {
        let date = p.date.unwrap_or_else(crate::tools::today);
        let result = diet::get_day(&self.database, &date).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List logged days with totals and entry counts, optionally within a date range")]
    fn list_diet_days(&self, Parameters(p): Parameters<ListDietDaysParams>) -> Result<CallToolResult, McpError> {
        let result = diet::list_days(&self.database, p.start_date.as_deref(), p.end_date.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete a diet entry by ID. The day's totals are recalculated.")]
    fn delete_diet_entry(&self, Parameters(p): Parameters<DeleteDietEntryParams>) -> Result<CallToolResult, McpError> {
        let result = diet::delete_entry(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(deleted) => json_result(&deleted),
            None => Ok(CallToolResult::success(vec![Content::text(
                format!(r#"{{"error": "Diet entry not found", "id": {}}}"#, p.id),
            )])),
        }
    }

    #[tool(description = "Daily calories for a window of days ending at a date, one point per day (missing days are 0)")]
    fn calorie_trend(&self, Parameters(p): Parameters<CalorieTrendParams>) -> Result<CallToolResult, McpError> {
        let end_date = p.end_date.unwrap_or_else(crate::tools::today);
        let days = p.days.unwrap_or(self.trend_days);
        let result = diet::calorie_trend(&self.database, &end_date, days)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Health ---

    #[tool(description = "Log a weight (kg) and sleep (hours) reading for a date. Missing values are recorded as 0.")]
    fn log_health(&self, Parameters(p): Parameters<LogHealthParams>) -> Result<CallToolResult, McpError> {
        let date = p.date.unwrap_or_else(crate::tools::today);
        let result = health::log_health(&self.database, &date, p.weight_kg, p.sleep_hours)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List recent weight and sleep readings, newest first")]
    fn list_health(&self, Parameters(p): Parameters<ListHealthParams>) -> Result<CallToolResult, McpError> {
        let result = health::list_health(&self.database, p.limit).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Finance ---

    #[tool(description = "Budget categories with this month's spend, totals, remaining budget and usage percent. Reports whether recurring bills are due.")]
    fn finance_summary(&self, Parameters(p): Parameters<MonthParams>) -> Result<CallToolResult, McpError> {
        let month = p.month.unwrap_or_else(crate::tools::this_month);
        let result = finance::finance_summary(&self.database, &month).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Add spend to a budget category for the current month")]
    fn add_spend(&self, Parameters(p): Parameters<AddSpendParams>) -> Result<CallToolResult, McpError> {
        let result = finance::add_spend(&self.database, &p.key, p.amount)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Set the monthly budget of a category")]
    fn set_category_budget(&self, Parameters(p): Parameters<SetCategoryBudgetParams>) -> Result<CallToolResult, McpError> {
        let result = finance::set_category_budget(&self.database, &p.key, p.budget)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Clear this month's spend without recording it in history")]
    fn clear_month_spend(&self) -> Result<CallToolResult, McpError> {
        let cleared = finance::clear_month(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&serde_json::json!({ "cleared": cleared }))
    }

    #[tool(description = "Book every recurring bill into spend. Does nothing if bills were already applied for the month.")]
    fn apply_recurring_bills(&self, Parameters(p): Parameters<MonthParams>) -> Result<CallToolResult, McpError> {
        let month = p.month.unwrap_or_else(crate::tools::this_month);
        let result = finance::apply_recurring(&self.database, &month)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Close a month: record its spend total in history and clear spend for the next month")]
    fn close_month(&self, Parameters(p): Parameters<MonthParams>) -> Result<CallToolResult, McpError> {
        let month = p.month.unwrap_or_else(crate::tools::this_month);
        let result = finance::close_month(&self.database, &month).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List recurring bills and their monthly total")]
    fn list_recurring_bills(&self) -> Result<CallToolResult, McpError> {
        let result = finance::list_recurring(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Add a recurring monthly bill. The category key defaults to one derived from the name.")]
    fn add_recurring_bill(&self, Parameters(p): Parameters<AddRecurringBillParams>) -> Result<CallToolResult, McpError> {
        let result = finance::add_recurring(&self.database, &p.name, p.key.as_deref(), p.amount)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Delete a recurring bill by ID")]
    fn delete_recurring_bill(&self, Parameters(p): Parameters<DeleteRecurringBillParams>) -> Result<CallToolResult, McpError> {
        let result = finance::delete_recurring(&self.database, p.id).map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(deleted) => json_result(&deleted),
            None => Ok(CallToolResult::success(vec![Content::text(
                format!(r#"{{"error": "Recurring bill not found", "id": {}}}"#, p.id),
            )])),
        }
    }

    #[tool(description = "List closed months with their spend totals")]
    fn list_finance_history(&self) -> Result<CallToolResult, McpError> {
        let result = finance::list_history(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Savings ---

    #[tool(description = "Emergency fund balance, target, percent and shortfall. The first call in a month records a balance snapshot.")]
    fn emergency_fund_status(&self, Parameters(p): Parameters<FundStatusParams>) -> Result<CallToolResult, McpError> {
        let date = p.date.unwrap_or_else(crate::tools::today);
        let result = savings::fund_status(&self.database, &date).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Update emergency fund balance, baseline, monthly expenses or months target. Omitted fields are unchanged.")]
    fn update_emergency_fund(&self, Parameters(p): Parameters<UpdateEmergencyFundParams>) -> Result<CallToolResult, McpError> {
        let update = EmergencyFundUpdate {
            balance: p.balance,
            baseline: p.baseline,
            months_target: p.months_target,
            monthly_expenses: p.monthly_expenses,
        };
        let result = savings::update_fund(&self.database, &update).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Record the current emergency fund balance for a date")]
    fn log_savings_snapshot(&self, Parameters(p): Parameters<LogSavingsSnapshotParams>) -> Result<CallToolResult, McpError> {
        let date = p.date.unwrap_or_else(crate::tools::today);
        let result = savings::log_snapshot(&self.database, &date).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List emergency fund snapshots in recording order")]
    fn list_savings_snapshots(&self) -> Result<CallToolResult, McpError> {
        let result = savings::list_snapshots(&self.database).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Trends ---

    #[tool(description = "Chart series of {name, value} points: spend per closed month, savings snapshots, weight, sleep or calories per day")]
    fn get_trend(&self, Parameters(p): Parameters<GetTrendParams>) -> Result<CallToolResult, McpError> {
        let result = trends::get_trend(&self.database, p.series).map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Export ---

    #[tool(description = "Export diet history as CSV (daily totals followed by entries). Writes to `path` when given, otherwise returns the CSV.")]
    fn export_diet_csv(&self, Parameters(p): Parameters<ExportCsvParams>) -> Result<CallToolResult, McpError> {
        let result = export::export_diet(&self.database, p.path.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Export weight and sleep history as CSV. Writes to `path` when given, otherwise returns the CSV.")]
    fn export_health_csv(&self, Parameters(p): Parameters<ExportCsvParams>) -> Result<CallToolResult, McpError> {
        let result = export::export_health(&self.database, p.path.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Export closed months and their spend totals as CSV. Writes to `path` when given, otherwise returns the CSV.")]
    fn export_finance_csv(&self, Parameters(p): Parameters<ExportCsvParams>) -> Result<CallToolResult, McpError> {
        let result = export::export_finance(&self.database, p.path.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Export emergency fund snapshots as CSV. Writes to `path` when given, otherwise returns the CSV.")]
    fn export_savings_csv(&self, Parameters(p): Parameters<ExportCsvParams>) -> Result<CallToolResult, McpError> {
        let result = export::export_savings(&self.database, p.path.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for LifeHubService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "lifehub".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("LifeHub".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "LifeHub - Diet estimation, food diary, health log, monthly budget and emergency fund. \
                 IMPORTANT: Call diet_instructions before logging food. \
                 Catalog: list_food_catalog, match_food, estimate_food. \
                 Diary: log_food, get_diet_day, list_diet_days, delete_diet_entry, calorie_trend. \
                 Health: log_health, list_health. \
                 Finance: finance_summary, add_spend, set_category_budget, clear_month_spend, \
                 apply_recurring_bills, close_month, list_recurring_bills, add_recurring_bill, \
                 delete_recurring_bill, list_finance_history. \
                 Savings: emergency_fund_status, update_emergency_fund, log_savings_snapshot, list_savings_snapshots. \
                 Trends: get_trend. \
                 Export: export_diet_csv, export_health_csv, export_finance_csv, export_savings_csv."
                    .into(),
            ),
        }
    }
}

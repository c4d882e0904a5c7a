//! Monthly budget MCP Tools
//!
//! Category budgets, spend for the open month, recurring bills booked once per
//! month, and closing a month into history.

use serde::Serialize;

use crate::db::{Database, DbError};
use crate::models::{
    AppSetting, BudgetCategory, MonthTotal, RecurringBill, RecurringBillCreate, Spend,
    RECURRING_APPLIED_MONTH,
};

use super::{parse_month, percent, progress_percent, round_cents};

/// One category's standing this month
#[derive(Debug, Serialize)]
pub struct CategorySpend {
    pub key: String,
    pub name: String,
    pub budget: f64,
    pub spent: f64,
    /// Progress bar fill, 0 to 100
    pub percent: i64,
}

/// Response for finance_summary
#[derive(Debug, Serialize)]
pub struct FinanceSummary {
    pub month: String,
    pub categories: Vec<CategorySpend>,
    /// Spend booked to keys with no budget category
    pub uncategorised: Vec<Spend>,
    pub total_spend: f64,
    pub total_budget: f64,
    pub remaining: f64,
    /// Share of the total budget used; may exceed 100
    pub usage_percent: i64,
    pub recurring_applied_month: Option<String>,
    pub recurring_due: bool,
}

/// Response for add_spend
#[derive(Debug, Serialize)]
pub struct AddSpendResponse {
    pub key: String,
    pub added: f64,
    pub category_spent: f64,
    pub total_spend: f64,
}

/// Response for apply_recurring_bills
#[derive(Debug, Serialize)]
pub struct ApplyRecurringResponse {
    pub month: String,
    /// False when this month's bills were already booked
    pub applied: bool,
    pub bills_applied: usize,
    pub amount_added: f64,
    pub total_spend: f64,
}

/// Response for close_month
#[derive(Debug, Serialize)]
pub struct CloseMonthResponse {
    pub closed: MonthTotal,
    pub months_in_history: usize,
}

/// Response for list_recurring_bills
#[derive(Debug, Serialize)]
pub struct ListRecurringResponse {
    pub bills: Vec<RecurringBill>,
    pub total: usize,
    pub monthly_amount: f64,
}

/// Response for list_finance_history
#[derive(Debug, Serialize)]
pub struct FinanceHistoryResponse {
    pub months: Vec<MonthTotal>,
    pub total: usize,
}

fn applied_month(conn: &rusqlite::Connection) -> Result<Option<String>, DbError> {
    Ok(AppSetting::get(conn, RECURRING_APPLIED_MONTH)?.filter(|m| !m.is_empty()))
}

/// Budget overview for `month`
pub fn finance_summary(db: &Database, month: &str) -> Result<FinanceSummary, String> {
    let month = parse_month(month)?;
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let categories = BudgetCategory::list(&conn).map_err(|e| format!("Failed to list categories: {}", e))?;
    let mut spend = Spend::list(&conn).map_err(|e| format!("Failed to load spend: {}", e))?;
    let recurring_applied_month = applied_month(&conn).map_err(|e| format!("Failed to read settings: {}", e))?;

    let total_spend = round_cents(spend.iter().map(|s| s.amount).sum());
    let total_budget = round_cents(categories.iter().map(|c| c.budget).sum());

    let categories: Vec<CategorySpend> = categories
        .into_iter()
        .map(|c| {
            let spent = spend
                .iter()
                .position(|s| s.key == c.key)
                .map(|i| spend.swap_remove(i).amount)
                .unwrap_or(0.0);
            CategorySpend {
                percent: progress_percent(spent, c.budget),
                spent: round_cents(spent),
                key: c.key,
                name: c.name,
                budget: c.budget,
            }
        })
        .collect();
    spend.sort_by(|a, b| a.key.cmp(&b.key));

    Ok(FinanceSummary {
        recurring_due: recurring_applied_month.as_deref() != Some(month.as_str()),
        month,
        categories,
        uncategorised: spend,
        total_spend,
        total_budget,
        remaining: round_cents(total_budget - total_spend),
        usage_percent: percent(total_spend, total_budget),
        recurring_applied_month,
    })
}

/// Add an amount to a budget category's spend this month
pub fn add_spend(db: &Database, key: &str, amount: f64) -> Result<AddSpendResponse, String> {
    if !amount.is_finite() || amount == 0.0 {
        return Err("Amount must be a non-zero number".to_string());
    }

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let key = key.trim().to_lowercase();

    BudgetCategory::get_by_key(&conn, &key)
        .map_err(|e| format!("Failed to get category: {}", e))?
        .ok_or_else(|| format!("Unknown budget category '{}'", key))?;

    let category_spent = Spend::add(&conn, &key, amount).map_err(|e| format!("Failed to add spend: {}", e))?;
    let total_spend = Spend::total(&conn).map_err(|e| format!("Failed to total spend: {}", e))?;

    tracing::info!(key = %key, amount, "Added spend");

    Ok(AddSpendResponse {
        key,
        added: amount,
        category_spent: round_cents(category_spent),
        total_spend: round_cents(total_spend),
    })
}

/// Change a category's monthly budget
pub fn set_category_budget(db: &Database, key: &str, budget: f64) -> Result<BudgetCategory, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    BudgetCategory::set_budget(&conn, key.trim(), budget).map_err(|e| format!("Failed to set budget: {}", e))
}

/// Drop this month's spend without recording it
pub fn clear_month(db: &Database) -> Result<usize, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let cleared = Spend::clear(&conn).map_err(|e| format!("Failed to clear spend: {}", e))?;
    tracing::info!(cleared, "Cleared month spend");
    Ok(cleared)
}

/// Book every recurring bill into spend, at most once per month
pub fn apply_recurring(db: &Database, month: &str) -> Result<ApplyRecurringResponse, String> {
    let month = parse_month(month)?;

    let response = db
        .with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            if applied_month(&tx)?.as_deref() == Some(month.as_str()) {
                let total_spend = Spend::total(&tx)?;
                return Ok(ApplyRecurringResponse {
                    month: month.clone(),
                    applied: false,
                    bills_applied: 0,
                    amount_added: 0.0,
                    total_spend: round_cents(total_spend),
                });
            }

            let bills = RecurringBill::list(&tx)?;
            for bill in &bills {
                Spend::add(&tx, &bill.key, bill.amount)?;
            }
            AppSetting::set(&tx, RECURRING_APPLIED_MONTH, &month)?;
            let total_spend = Spend::total(&tx)?;
            tx.commit()?;

            Ok(ApplyRecurringResponse {
                month: month.clone(),
                applied: true,
                bills_applied: bills.len(),
                amount_added: round_cents(bills.iter().map(|b| b.amount).sum()),
                total_spend: round_cents(total_spend),
            })
        })
        .map_err(|e| format!("Failed to apply recurring bills: {}", e))?;

    if response.applied {
        tracing::info!(month = %response.month, bills = response.bills_applied, "Applied recurring bills");
    }
    Ok(response)
}

/// Record this month's total in history, then start a fresh month
pub fn close_month(db: &Database, month: &str) -> Result<CloseMonthResponse, String> {
    let month = parse_month(month)?;

    let response = db
        .with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let total = round_cents(Spend::total(&tx)?);
            let closed = MonthTotal::create(&tx, &month, total)?;
            Spend::clear(&tx)?;
            AppSetting::set(&tx, RECURRING_APPLIED_MONTH, "")?;
            let months_in_history = MonthTotal::list_all(&tx)?.len();
            tx.commit()?;
            Ok(CloseMonthResponse { closed, months_in_history })
        })
        .map_err(|e| format!("Failed to close month: {}", e))?;

    tracing::info!(month = %response.closed.month, total = response.closed.total, "Closed month");
    Ok(response)
}

pub fn list_recurring(db: &Database) -> Result<ListRecurringResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let bills = RecurringBill::list(&conn).map_err(|e| format!("Failed to list recurring bills: {}", e))?;

    let monthly_amount = round_cents(bills.iter().map(|b| b.amount).sum());
    let total = bills.len();
    Ok(ListRecurringResponse { bills, total, monthly_amount })
}

pub fn add_recurring(db: &Database, name: &str, key: Option<&str>, amount: f64) -> Result<RecurringBill, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let data = RecurringBillCreate {
        key: key.map(str::to_string),
        name: name.to_string(),
        amount,
    };

    let bill = RecurringBill::create(&conn, &data).map_err(|e| format!("Failed to add recurring bill: {}", e))?;
    tracing::info!(key = %bill.key, amount = bill.amount, "Added recurring bill");
    Ok(bill)
}

/// Delete a recurring bill; `None` when it did not exist
pub fn delete_recurring(db: &Database, id: i64) -> Result<Option<RecurringBill>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let Some(bill) = RecurringBill::get_by_id(&conn, id).map_err(|e| format!("Failed to get recurring bill: {}", e))? else {
        return Ok(None);
    };
    RecurringBill::delete(&conn, id).map_err(|e| format!("Failed to delete recurring bill: {}", e))?;
    Ok(Some(bill))
}

/// Closed months, oldest close first
pub fn list_history(db: &Database) -> Result<FinanceHistoryResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let months = MonthTotal::list_all(&conn).map_err(|e| format!("Failed to list history: {}", e))?;
    let total = months.len();
    Ok(FinanceHistoryResponse { months, total })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_summary() {
        let db = Database::in_memory().unwrap();
        let summary = finance_summary(&db, "2025-03").unwrap();

        assert_eq!(summary.categories.len(), 7);
        assert_eq!(summary.total_spend, 0.0);
        assert_eq!(summary.total_budget, 1402.79);
        assert_eq!(summary.remaining, 1402.79);
        assert_eq!(summary.usage_percent, 0);
        assert!(summary.recurring_due);
        assert_eq!(summary.recurring_applied_month, None);
    }

    #[test]
    fn test_add_spend_updates_category_and_totals() {
        let db = Database::in_memory().unwrap();

        add_spend(&db, "food", 120.0).unwrap();
        let response = add_spend(&db, " Food ", 30.5).unwrap();
        assert_eq!(response.category_spent, 150.5);
        assert_eq!(response.total_spend, 150.5);

        let summary = finance_summary(&db, "2025-03").unwrap();
        let food = summary.categories.iter().find(|c| c.key == "food").unwrap();
        assert_eq!(food.spent, 150.5);
        assert_eq!(food.percent, 60);
        assert_eq!(summary.remaining, 1252.29);
    }

    #[test]
    fn test_add_spend_rejects_bad_input() {
        let db = Database::in_memory().unwrap();
        assert!(add_spend(&db, "food", 0.0).is_err());
        assert!(add_spend(&db, "food", f64::NAN).is_err());
        assert!(add_spend(&db, "yachts", 10.0).is_err());
    }

    #[test]
    fn test_category_percent_is_capped() {
        let db = Database::in_memory().unwrap();
        add_spend(&db, "gym", 78.0).unwrap();

        let summary = finance_summary(&db, "2025-03").unwrap();
        let gym = summary.categories.iter().find(|c| c.key == "gym").unwrap();
        assert_eq!(gym.percent, 100);
    }

    #[test]
    fn test_recurring_applies_once_per_month() {
        let db = Database::in_memory().unwrap();

        let first = apply_recurring(&db, "2025-03").unwrap();
        assert!(first.applied);
        assert_eq!(first.bills_applied, 3);
        assert_eq!(first.amount_added, 492.79);
        assert_eq!(first.total_spend, 492.79);

        let again = apply_recurring(&db, "2025-03").unwrap();
        assert!(!again.applied);
        assert_eq!(again.total_spend, 492.79);

        let summary = finance_summary(&db, "2025-03").unwrap();
        assert!(!summary.recurring_due);
        assert!(finance_summary(&db, "2025-04").unwrap().recurring_due);
    }

    #[test]
    fn test_recurring_to_unknown_key_counts_in_total() {
        let db = Database::in_memory().unwrap();
        add_recurring(&db, "Water Bill", None, 25.0).unwrap();

        apply_recurring(&db, "2025-03").unwrap();
        let summary = finance_summary(&db, "2025-03").unwrap();
        assert_eq!(summary.uncategorised.len(), 1);
        assert_eq!(summary.uncategorised[0].key, "water-bill");
        assert_eq!(summary.total_spend, 517.79);
    }

    #[test]
    fn test_close_month_records_history_and_resets() {
        let db = Database::in_memory().unwrap();
        apply_recurring(&db, "2025-03").unwrap();
        add_spend(&db, "food", 7.21).unwrap();

        let closed = close_month(&db, "2025-03").unwrap();
        assert_eq!(closed.closed.month, "2025-03");
        assert_eq!(closed.closed.total, 500.0);
        assert_eq!(closed.months_in_history, 1);

        let summary = finance_summary(&db, "2025-03").unwrap();
        assert_eq!(summary.total_spend, 0.0);
        assert!(summary.recurring_due);
        assert_eq!(summary.recurring_applied_month, None);

        // the same month can be booked again after closing
        assert!(apply_recurring(&db, "2025-03").unwrap().applied);
        assert_eq!(list_history(&db).unwrap().total, 1);
    }

    #[test]
    fn test_clear_month_keeps_history() {
        let db = Database::in_memory().unwrap();
        add_spend(&db, "food", 10.0).unwrap();
        add_spend(&db, "rent", 10.0).unwrap();

        assert_eq!(clear_month(&db).unwrap(), 2);
        assert_eq!(finance_summary(&db, "2025-03").unwrap().total_spend, 0.0);
        assert_eq!(list_history(&db).unwrap().total, 0);
    }

    #[test]
    fn test_recurring_bill_management() {
        let db = Database::in_memory().unwrap();

        let listed = list_recurring(&db).unwrap();
        assert_eq!(listed.total, 3);
        assert_eq!(listed.monthly_amount, 492.79);

        let added = add_recurring(&db, "Spotify", Some("other"), 11.99).unwrap();
        assert!(delete_recurring(&db, added.id).unwrap().is_some());
        assert!(delete_recurring(&db, added.id).unwrap().is_none());
        assert!(add_recurring(&db, "Spotify", None, 0.0).is_err());
    }

    #[test]
    fn test_set_category_budget_changes_totals() {
        let db = Database::in_memory().unwrap();
        set_category_budget(&db, "other", 200.0).unwrap();

        assert_eq!(finance_summary(&db, "2025-03").unwrap().total_budget, 1502.79);
        assert!(set_category_budget(&db, "yachts", 1.0).is_err());
        assert!(finance_summary(&db, "March").is_err());
    }
}

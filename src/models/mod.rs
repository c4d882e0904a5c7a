//! Data models
//!
//! Rust structs representing database entities.

mod app_setting;
mod budget_category;
mod diet_day;
mod diet_entry;
mod emergency_fund;
mod health_entry;
mod month_total;
mod recurring_bill;
mod savings_snapshot;
mod spend;

pub use app_setting::{AppSetting, RECURRING_APPLIED_MONTH};
pub use budget_category::BudgetCategory;
pub use diet_day::DietDay;
pub use diet_entry::{DietEntry, DietEntryCreate};
pub use emergency_fund::{EmergencyFund, EmergencyFundUpdate, MONTHS_TARGET_RANGE};
pub use health_entry::{HealthEntry, HealthEntryCreate};
pub use month_total::MonthTotal;
pub use recurring_bill::{derive_key, RecurringBill, RecurringBillCreate};
pub use savings_snapshot::SavingsSnapshot;
pub use spend::Spend;

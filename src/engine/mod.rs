//! The aggregation and filtering engine.
//!
//! Everything in here is a pure function of a transaction snapshot (and, for the dashboard, of the
//! date passed in as "today"). Nothing is cached or stored; callers recompute on every change.

mod aggregate;
mod filter;
mod views;

#[cfg(test)]
mod test_data;

pub use aggregate::{
    group_by_category, group_by_month, percentage_change, total_by_type, CategoryTotal,
    MonthTotals,
};
pub use filter::{
    filter_by_category, filter_by_month, filter_by_type, sort_by_date_desc, unique_months,
    Filters, Selection, ALL,
};
pub use views::{
    average_daily_spend, savings_rate, CategoryBreakdown, CategorySlice, DashboardSummary,
    MonthBar, MonthlyOverview, RecurringTotals, SavingsVerdict, Subtotal, TARGET_SAVINGS_RATE,
};

//! Views assembled from the aggregations and filters: the dashboard summary and the data behind the
//! category and monthly charts.

use crate::engine::aggregate::{
    group_by_category, group_by_month, percent_of, percentage_change, total_by_type,
};
use crate::engine::filter::{filter_by_month, filter_by_type, Selection};
use crate::model::{resolve_category, Amount, MonthKey, Transaction, TransactionType};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

/// The savings rate at or above which savings are considered on track.
pub const TARGET_SAVINGS_RATE: Decimal = Decimal::from_parts(20, 0, 0, false, 0);

/// Total and number of transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Subtotal {
    pub total: Amount,
    pub count: usize,
}

impl Subtotal {
    fn of<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        transactions
            .into_iter()
            .fold(Subtotal::default(), |acc, t| Subtotal {
                total: acc.total + t.amount,
                count: acc.count + 1,
            })
    }
}

/// Subtotals of the transactions flagged as recurring, split by type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecurringTotals {
    pub income: Subtotal,
    pub expense: Subtotal,
}

impl RecurringTotals {
    pub fn compute(transactions: &[Transaction]) -> Self {
        let recurring_of = |transaction_type: TransactionType| {
            Subtotal::of(
                transactions
                    .iter()
                    .filter(|t| t.recurring && t.transaction_type == transaction_type),
            )
        };
        Self {
            income: recurring_of(TransactionType::Income),
            expense: recurring_of(TransactionType::Expense),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.income.count == 0 && self.expense.count == 0
    }
}

/// `balance / total_income * 100`, or zero when there is no income.
pub fn savings_rate(balance: Amount, total_income: Amount) -> Decimal {
    if !total_income.is_positive() {
        return Decimal::ZERO;
    }
    percent_of(balance.value(), total_income.value())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SavingsVerdict {
    /// At least `TARGET_SAVINGS_RATE` percent of income is saved.
    OnTrack,
    BelowTarget,
}

impl SavingsVerdict {
    pub fn of(rate: Decimal) -> Self {
        if rate >= TARGET_SAVINGS_RATE {
            SavingsVerdict::OnTrack
        } else {
            SavingsVerdict::BelowTarget
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            SavingsVerdict::OnTrack => "Great job! You're saving well.",
            SavingsVerdict::BelowTarget => "Try to save at least 20% of your income.",
        }
    }
}

/// This month's expenses divided by today's day of the month.
///
/// This is an approximation: early in the month it is computed over few days, and it only covers
/// the whole month on its last day. It is not divided by the length of the month.
pub fn average_daily_spend(current_month_expense: Amount, today: NaiveDate) -> Amount {
    Amount::new(current_month_expense.value() / Decimal::from(today.day()))
}

/// Everything the dashboard shows.
///
/// "Current" and "previous" month are taken from the `today` passed to `compute`, not from the
/// data. A month without transactions contributes zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardSummary {
    pub total_income: Amount,
    pub total_expense: Amount,
    pub balance: Amount,
    /// Number of transactions across all months.
    pub transaction_count: usize,
    pub current_month: MonthKey,
    pub current_month_income: Amount,
    pub current_month_expense: Amount,
    pub current_month_balance: Amount,
    pub current_month_count: usize,
    pub previous_month: MonthKey,
    pub previous_month_income: Amount,
    pub previous_month_expense: Amount,
    /// Percent change of this month's income over last month's.
    pub income_change: Decimal,
    /// Percent change of this month's expense over last month's.
    pub expense_change: Decimal,
    pub recurring: RecurringTotals,
    pub savings_rate: Decimal,
    pub savings_verdict: SavingsVerdict,
    pub average_daily_spend: Amount,
}

impl DashboardSummary {
    pub fn compute(transactions: &[Transaction], today: NaiveDate) -> Self {
        let current_month = MonthKey::of(today);
        let previous_month = current_month.previous();

        let total_income = total_by_type(transactions, TransactionType::Income);
        let total_expense = total_by_type(transactions, TransactionType::Expense);
        let balance = total_income - total_expense;

        let current = filter_by_month(transactions, &Selection::Only(current_month));
        let current_month_income = total_by_type(&current, TransactionType::Income);
        let current_month_expense = total_by_type(&current, TransactionType::Expense);

        let previous = filter_by_month(transactions, &Selection::Only(previous_month));
        let previous_month_income = total_by_type(&previous, TransactionType::Income);
        let previous_month_expense = total_by_type(&previous, TransactionType::Expense);

        let savings_rate = savings_rate(balance, total_income);

        Self {
            total_income,
            total_expense,
            balance,
            transaction_count: transactions.len(),
            current_month,
            current_month_income,
            current_month_expense,
            current_month_balance: current_month_income - current_month_expense,
            current_month_count: current.len(),
            previous_month,
            previous_month_income,
            previous_month_expense,
            income_change: percentage_change(
                current_month_income.value(),
                previous_month_income.value(),
            ),
            expense_change: percentage_change(
                current_month_expense.value(),
                previous_month_expense.value(),
            ),
            recurring: RecurringTotals::compute(transactions),
            savings_rate,
            savings_verdict: SavingsVerdict::of(savings_rate),
            average_daily_spend: average_daily_spend(current_month_expense, today),
        }
    }
}

/// One slice of the category chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySlice {
    /// The category key as stored on the transactions.
    pub key: String,
    pub label: &'static str,
    pub color: &'static str,
    pub total: Amount,
    pub count: usize,
    /// Percent of the breakdown total.
    pub share: Decimal,
}

/// Totals per category for one transaction type, with resolved labels and colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBreakdown {
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub total: Amount,
    /// In the order each category first occurs in the input.
    pub slices: Vec<CategorySlice>,
}

impl CategoryBreakdown {
    pub fn compute(transactions: &[Transaction], transaction_type: TransactionType) -> Self {
        let of_type = filter_by_type(transactions, &Selection::Only(transaction_type));
        let groups = group_by_category(&of_type);
        let total: Amount = groups.iter().map(|g| g.total).sum();
        let slices = groups
            .into_iter()
            .map(|g| {
                let info = resolve_category(&g.category, transaction_type);
                let share = if total.is_zero() {
                    Decimal::ZERO
                } else {
                    percent_of(g.total.value(), total.value())
                };
                CategorySlice {
                    key: g.category,
                    label: info.label,
                    color: info.color,
                    total: g.total,
                    count: g.count,
                    share,
                }
            })
            .collect();
        Self {
            transaction_type,
            total,
            slices,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.slices.is_empty()
    }
}

/// One bar group of the monthly chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthBar {
    pub month: MonthKey,
    /// Short label, e.g. `Jan 24`.
    pub label: String,
    /// Long label, e.g. `January 2024`.
    pub full_label: String,
    pub income: Amount,
    pub expense: Amount,
    pub net: Amount,
}

/// Income, expense and net per month, oldest first, with grand totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MonthlyOverview {
    pub months: Vec<MonthBar>,
    pub total_income: Amount,
    pub total_expense: Amount,
    pub net: Amount,
}

impl MonthlyOverview {
    pub fn compute(transactions: &[Transaction]) -> Self {
        let months: Vec<MonthBar> = group_by_month(transactions)
            .into_iter()
            .map(|m| MonthBar {
                month: m.month,
                label: m.month.short_name(),
                full_label: m.month.long_name(),
                income: m.income,
                expense: m.expense,
                net: m.net(),
            })
            .collect();
        let total_income: Amount = months.iter().map(|m| m.income).sum();
        let total_expense: Amount = months.iter().map(|m| m.expense).sum();
        Self {
            months,
            total_income,
            total_expense,
            net: total_income - total_expense,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

//! Read-only commands: the transaction list, the dashboard summary and the chart data.

use crate::args::{CategoriesArgs, FilterArgs};
use crate::commands::{open_ledger, plural, Out};
use crate::engine::{unique_months, CategoryBreakdown, DashboardSummary, Filters, MonthlyOverview};
use crate::model::category::vocabulary;
use crate::model::{resolve_category, MonthKey, Transaction, TransactionType};
use crate::{Config, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt::Write;

/// Lists the transactions selected by the filters, newest first.
pub async fn list(config: Config, args: FilterArgs) -> Result<Out<Vec<Transaction>>> {
    let ledger = open_ledger(&config).await?;
    let selected = args.filters().apply(ledger.transactions());
    if selected.is_empty() {
        return Ok(Out::new("No transactions found", selected));
    }
    let mut message = String::new();
    for t in &selected {
        let _ = writeln!(message, "{}", row(t));
    }
    let _ = write!(
        message,
        "{}",
        plural(selected.len(), "transaction", "transactions")
    );
    Ok(Out::new(message, selected))
}

fn row(t: &Transaction) -> String {
    let label = resolve_category(t.category(), t.transaction_type()).label;
    let sign = match t.transaction_type() {
        TransactionType::Income => '+',
        TransactionType::Expense => '-',
    };
    let mut line = format!(
        "{:<15} {} {:<7} {:<18} {:>13}",
        t.id().to_string(),
        t.date(),
        t.transaction_type().to_string(),
        label,
        format!("{sign}{}", t.amount())
    );
    if let Some(note) = t.note() {
        let _ = write!(line, "  {note}");
    }
    if t.recurring() {
        line.push_str("  (recurring)");
    }
    line
}

/// Totals, this month against last month, recurring totals and the savings rate, as of `today`.
pub async fn summary(config: Config, today: NaiveDate) -> Result<Out<DashboardSummary>> {
    let ledger = open_ledger(&config).await?;
    let s = DashboardSummary::compute(ledger.transactions(), today);

    let mut m = String::new();
    let _ = writeln!(m, "Balance:        {:>13}", s.balance.to_string());
    let _ = writeln!(m, "Total income:   {:>13}", s.total_income.to_string());
    let _ = writeln!(m, "Total expenses: {:>13}", s.total_expense.to_string());
    let _ = writeln!(
        m,
        "Transactions:   {:>13}",
        s.transaction_count.to_string()
    );
    let _ = writeln!(m);
    let _ = writeln!(m, "{}", s.current_month.long_name());
    let _ = writeln!(
        m,
        "  Income:   {:>13}  {} vs {}",
        s.current_month_income.to_string(),
        percent_change(s.income_change),
        s.previous_month.long_name()
    );
    let _ = writeln!(
        m,
        "  Expenses: {:>13}  {} vs {}",
        s.current_month_expense.to_string(),
        percent_change(s.expense_change),
        s.previous_month.long_name()
    );
    let _ = writeln!(m, "  Balance:  {:>13}", s.current_month_balance.to_string());
    let _ = writeln!(
        m,
        "  {}, {} per day on average",
        plural(s.current_month_count, "transaction", "transactions"),
        s.average_daily_spend
    );
    if !s.recurring.is_empty() {
        let _ = writeln!(m);
        let _ = writeln!(
            m,
            "Recurring income:   {:>13} ({})",
            s.recurring.income.total.to_string(),
            s.recurring.income.count
        );
        let _ = writeln!(
            m,
            "Recurring expenses: {:>13} ({})",
            s.recurring.expense.total.to_string(),
            s.recurring.expense.count
        );
    }
    let _ = writeln!(m);
    let _ = write!(
        m,
        "Savings rate: {}%. {}",
        s.savings_rate.round_dp(1),
        s.savings_verdict.message()
    );
    Ok(Out::new(m, s))
}

fn percent_change(change: Decimal) -> String {
    let rounded = change.round_dp(1);
    if rounded > Decimal::ZERO {
        format!("+{rounded}%")
    } else {
        format!("{rounded}%")
    }
}

/// The months that have transactions, newest first.
pub async fn months(config: Config) -> Result<Out<Vec<MonthKey>>> {
    let ledger = open_ledger(&config).await?;
    let months = unique_months(ledger.transactions());
    if months.is_empty() {
        return Ok(Out::new("No transactions yet", months));
    }
    let message = months
        .iter()
        .map(|m| format!("{m}  {}", m.long_name()))
        .collect::<Vec<_>>()
        .join("\n");
    Ok(Out::new(message, months))
}

/// How the income or expenses of the selected month are spread over categories.
pub async fn categories(config: Config, args: CategoriesArgs) -> Result<Out<CategoryBreakdown>> {
    let ledger = open_ledger(&config).await?;
    let filters = Filters::new(Default::default(), args.month().clone(), Default::default());
    let selected = filters.apply(ledger.transactions());
    let breakdown = CategoryBreakdown::compute(&selected, args.transaction_type());

    if breakdown.is_empty() {
        let known: Vec<&str> = vocabulary(args.transaction_type())
            .into_iter()
            .map(|info| info.key)
            .collect();
        let message = format!(
            "No {} transactions to show. The {} categories are: {}",
            args.transaction_type(),
            args.transaction_type(),
            known.join(", ")
        );
        return Ok(Out::new(message, breakdown));
    }

    let mut m = String::new();
    for slice in &breakdown.slices {
        let _ = writeln!(
            m,
            "{:<18} {:>13} {:>6}%  ({})",
            slice.label,
            slice.total.to_string(),
            slice.share.round_dp(1).to_string(),
            slice.count
        );
    }
    let _ = write!(m, "{:<18} {:>13}", "Total", breakdown.total.to_string());
    Ok(Out::new(m, breakdown))
}

/// Income, expenses and net per month for the transactions selected by the filters.
pub async fn monthly(config: Config, args: FilterArgs) -> Result<Out<MonthlyOverview>> {
    let ledger = open_ledger(&config).await?;
    let selected = args.filters().apply(ledger.transactions());
    let overview = MonthlyOverview::compute(&selected);
    if overview.is_empty() {
        return Ok(Out::new("No transactions found", overview));
    }

    let mut m = String::new();
    let _ = writeln!(
        m,
        "{:<8} {:>13} {:>13} {:>13}",
        "Month", "Income", "Expenses", "Net"
    );
    for bar in &overview.months {
        let _ = writeln!(
            m,
            "{:<8} {:>13} {:>13} {:>13}",
            bar.label,
            bar.income.to_string(),
            bar.expense.to_string(),
            bar.net.to_string()
        );
    }
    let _ = write!(
        m,
        "{:<8} {:>13} {:>13} {:>13}",
        "Total",
        overview.total_income.to_string(),
        overview.total_expense.to_string(),
        overview.net.to_string()
    );
    Ok(Out::new(m, overview))
}

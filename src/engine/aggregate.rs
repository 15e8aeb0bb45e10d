//! Sums and groupings over a snapshot of transactions.

use crate::model::{Amount, MonthKey, Transaction, TransactionType};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Sum of the amounts of all transactions of `transaction_type`. Zero for an empty input.
pub fn total_by_type(transactions: &[Transaction], transaction_type: TransactionType) -> Amount {
    transactions
        .iter()
        .filter(|t| t.transaction_type == transaction_type)
        .map(|t| t.amount)
        .sum()
}

/// The total and number of transactions that share a category key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: Amount,
    pub count: usize,
}

/// Groups transactions by their category key, summing amounts and counting records.
///
/// The input is expected to hold a single transaction type; the grouping itself does not look at
/// the type. Groups are returned in the order their category first occurs in the input, not
/// sorted.
pub fn group_by_category(transactions: &[Transaction]) -> Vec<CategoryTotal> {
    let mut groups: Vec<CategoryTotal> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    for t in transactions {
        let ix = *index.entry(t.category.as_str()).or_insert_with(|| {
            groups.push(CategoryTotal {
                category: t.category.clone(),
                total: Amount::ZERO,
                count: 0,
            });
            groups.len() - 1
        });
        let group = &mut groups[ix];
        group.total += t.amount;
        group.count += 1;
    }
    groups
}

/// Income and expense sums of one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthTotals {
    pub month: MonthKey,
    pub income: Amount,
    pub expense: Amount,
}

impl MonthTotals {
    fn new(month: MonthKey) -> Self {
        Self {
            month,
            income: Amount::ZERO,
            expense: Amount::ZERO,
        }
    }

    pub fn net(&self) -> Amount {
        self.income - self.expense
    }
}

/// Buckets transactions by month, accumulating income and expense independently.
///
/// Every transaction lands in exactly one bucket. The result is sorted by month, oldest first.
pub fn group_by_month(transactions: &[Transaction]) -> Vec<MonthTotals> {
    let mut buckets: BTreeMap<MonthKey, MonthTotals> = BTreeMap::new();
    for t in transactions {
        let month = t.month();
        let bucket = buckets
            .entry(month)
            .or_insert_with(|| MonthTotals::new(month));
        match t.transaction_type {
            TransactionType::Income => bucket.income += t.amount,
            TransactionType::Expense => bucket.expense += t.amount,
        }
    }
    buckets.into_values().collect()
}

/// Relative change from `previous` to `current`, in percent.
///
/// When `previous` is zero the result is `100` if `current` is positive and `0` otherwise, so
/// that new activity is distinguishable from no change.
pub fn percentage_change(current: Decimal, previous: Decimal) -> Decimal {
    if previous.is_zero() {
        return if current > Decimal::ZERO {
            Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };
    }
    percent_of(current.saturating_sub(previous), previous)
}

/// `part * 100 / whole` for a non-zero `whole`. Results that do not fit a `Decimal` saturate.
pub(crate) fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if let Some(p) = part
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|p| p.checked_div(whole))
    {
        return p;
    }
    match part.checked_div(whole) {
        Some(ratio) => ratio.saturating_mul(Decimal::ONE_HUNDRED),
        None if part.is_sign_negative() != whole.is_sign_negative() => Decimal::MIN,
        None => Decimal::MAX,
    }
}

//! Filters that select a subset of transactions, and the composite filter pipeline.

use crate::model::{MonthKey, Transaction, TransactionType};
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The sentinel that selects everything.
pub const ALL: &str = "all";

/// A filter selection: either everything, or only records that match a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Selection<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Selection::All => None,
            Selection::Only(v) => Some(v),
        }
    }
}

impl<T: PartialEq> Selection<T> {
    /// `true` when this selection is `All` or holds a value equal to `value`.
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(v) => v == value,
        }
    }
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

/// Only the exact text `all` is the sentinel, so a category that is literally called `All` can
/// still be selected.
impl<T: FromStr> FromStr for Selection<T> {
    type Err = T::Err;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL {
            return Ok(Selection::All);
        }
        T::from_str(s).map(Selection::Only)
    }
}

impl<T: Display> Display for Selection<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Selection::All => f.write_str(ALL),
            Selection::Only(v) => Display::fmt(v, f),
        }
    }
}

impl<T: Display> Serialize for Selection<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Keeps the transactions of `month`; the identity for `Selection::All`.
pub fn filter_by_month(transactions: &[Transaction], month: &Selection<MonthKey>) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| month.matches(&t.month()))
        .cloned()
        .collect()
}

/// Keeps the transactions whose category key equals `category` exactly; the identity for
/// `Selection::All`.
pub fn filter_by_category(transactions: &[Transaction], category: &Selection<String>) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| category.matches(&t.category))
        .cloned()
        .collect()
}

/// Keeps the transactions of `transaction_type`; the identity for `Selection::All`.
pub fn filter_by_type(
    transactions: &[Transaction],
    transaction_type: &Selection<TransactionType>,
) -> Vec<Transaction> {
    transactions
        .iter()
        .filter(|t| transaction_type.matches(&t.transaction_type))
        .cloned()
        .collect()
}

/// The distinct months that have transactions, most recent first.
///
/// Callers pass the full list, not a filtered one, so that the set of selectable months does not
/// change when other filters change.
pub fn unique_months(transactions: &[Transaction]) -> Vec<MonthKey> {
    let months: BTreeSet<MonthKey> = transactions.iter().map(Transaction::month).collect();
    months.into_iter().rev().collect()
}

/// Sorts by date, newest first. The sort is stable: transactions on the same date keep their
/// relative input order.
pub fn sort_by_date_desc(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.date.cmp(&a.date));
}

/// The three filter selections held by the host, and the pipeline that applies them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Filters {
    #[serde(rename = "type")]
    transaction_type: Selection<TransactionType>,
    month: Selection<MonthKey>,
    category: Selection<String>,
}

impl Filters {
    pub fn new(
        transaction_type: Selection<TransactionType>,
        month: Selection<MonthKey>,
        category: Selection<String>,
    ) -> Self {
        Self {
            transaction_type,
            month,
            category,
        }
    }

    pub fn transaction_type(&self) -> &Selection<TransactionType> {
        &self.transaction_type
    }

    pub fn month(&self) -> &Selection<MonthKey> {
        &self.month
    }

    pub fn category(&self) -> &Selection<String> {
        &self.category
    }

    /// Changes the type selection. Category keys are only meaningful within one type's
    /// vocabulary, so selecting a specific type resets the category selection to `All`.
    pub fn set_type(&mut self, transaction_type: Selection<TransactionType>) {
        if !transaction_type.is_all() {
            self.category = Selection::All;
        }
        self.transaction_type = transaction_type;
    }

    pub fn set_month(&mut self, month: Selection<MonthKey>) {
        self.month = month;
    }

    pub fn set_category(&mut self, category: Selection<String>) {
        self.category = category;
    }

    /// Resets all three selections to `All`.
    pub fn clear(&mut self) {
        *self = Filters::default();
    }

    /// `true` when no filter is active.
    pub fn is_cleared(&self) -> bool {
        self.transaction_type.is_all() && self.month.is_all() && self.category.is_all()
    }

    /// Runs the pipeline: type, then month, then category, then sort by date descending.
    ///
    /// Type is applied first because category keys are interpreted per type; a category key that
    /// exists in both vocabularies only matches records of the selected type.
    pub fn apply(&self, transactions: &[Transaction]) -> Vec<Transaction> {
        let by_type = filter_by_type(transactions, &self.transaction_type);
        let by_month = filter_by_month(&by_type, &self.month);
        let mut selected = filter_by_category(&by_month, &self.category);
        sort_by_date_desc(&mut selected);
        selected
    }
}

//! Transaction fixtures shared by the engine tests.

use crate::model::{parse_date, Amount, Transaction, TransactionType};
use std::str::FromStr;

pub(crate) fn tx(
    id: u64,
    transaction_type: TransactionType,
    amount: &str,
    category: &str,
    date: &str,
) -> Transaction {
    Transaction::new(
        id,
        transaction_type,
        Amount::from_str(amount).unwrap(),
        category,
        parse_date(date).unwrap(),
    )
}

/// One income in January and two food expenses in January and February 2024.
pub(crate) fn sample() -> Vec<Transaction> {
    vec![
        tx(1, TransactionType::Income, "1000", "salary", "2024-01-15"),
        tx(2, TransactionType::Expense, "200", "food", "2024-01-20"),
        tx(3, TransactionType::Expense, "50", "food", "2024-02-01"),
    ]
}

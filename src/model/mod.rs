//! Types that represent the core data model, such as `Transaction` and the category vocabularies.
mod amount;
pub mod category;
mod month;
pub(crate) mod transaction;

pub use amount::{Amount, AmountError};
pub use category::{resolve_category, CategoryInfo, ExpenseCategory, IncomeCategory};
pub use month::MonthKey;
pub use transaction::{
    parse_date, NewTransaction, Transaction, TransactionEdit, TransactionId, TransactionType,
};

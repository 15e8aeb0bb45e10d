//! The fixed category vocabularies, one per `TransactionType`.
//!
//! A transaction stores its category as a plain string key so that records imported from elsewhere
//! can carry keys outside the vocabulary. Lookups always succeed: an unknown key resolves to the
//! vocabulary's "other" entry.

use crate::model::TransactionType;
use serde::{Deserialize, Serialize};

/// The display record of a category.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
pub struct CategoryInfo {
    pub key: &'static str,
    pub label: &'static str,
    /// Hex color used when charting the category.
    pub color: &'static str,
}

/// Fallback for expense records whose category key is not in the expense vocabulary.
pub const OTHER_EXPENSE: CategoryInfo = CategoryInfo {
    key: "other",
    label: "Other",
    color: "#A8DADC",
};

/// Fallback for income records whose category key is not in the income vocabulary.
pub const OTHER_INCOME: CategoryInfo = CategoryInfo {
    key: "other",
    label: "Other Income",
    color: "#D8F3DC",
};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    Food,
    Transportation,
    Shopping,
    Entertainment,
    Bills,
    Healthcare,
    Education,
    Travel,
    Investment,
    Other,
}

serde_plain::derive_display_from_serialize!(ExpenseCategory);
serde_plain::derive_fromstr_from_deserialize!(ExpenseCategory);

impl ExpenseCategory {
    /// The vocabulary in display order.
    pub const ALL: [ExpenseCategory; 10] = [
        ExpenseCategory::Food,
        ExpenseCategory::Transportation,
        ExpenseCategory::Shopping,
        ExpenseCategory::Entertainment,
        ExpenseCategory::Bills,
        ExpenseCategory::Healthcare,
        ExpenseCategory::Education,
        ExpenseCategory::Travel,
        ExpenseCategory::Investment,
        ExpenseCategory::Other,
    ];

    pub fn info(&self) -> &'static CategoryInfo {
        match self {
            ExpenseCategory::Food => &CategoryInfo {
                key: "food",
                label: "Food & Dining",
                color: "#FF6B6B",
            },
            ExpenseCategory::Transportation => &CategoryInfo {
                key: "transportation",
                label: "Transportation",
                color: "#4ECDC4",
            },
            ExpenseCategory::Shopping => &CategoryInfo {
                key: "shopping",
                label: "Shopping",
                color: "#95E1D3",
            },
            ExpenseCategory::Entertainment => &CategoryInfo {
                key: "entertainment",
                label: "Entertainment",
                color: "#F38181",
            },
            ExpenseCategory::Bills => &CategoryInfo {
                key: "bills",
                label: "Bills & Utilities",
                color: "#AA96DA",
            },
            ExpenseCategory::Healthcare => &CategoryInfo {
                key: "healthcare",
                label: "Healthcare",
                color: "#FCBAD3",
            },
            ExpenseCategory::Education => &CategoryInfo {
                key: "education",
                label: "Education",
                color: "#F9ED69",
            },
            ExpenseCategory::Travel => &CategoryInfo {
                key: "travel",
                label: "Travel",
                color: "#08D9D6",
            },
            ExpenseCategory::Investment => &CategoryInfo {
                key: "investment",
                label: "Investment",
                color: "#FF2E63",
            },
            ExpenseCategory::Other => &OTHER_EXPENSE,
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeCategory {
    Salary,
    Freelance,
    Investment,
    Business,
    Other,
}

serde_plain::derive_display_from_serialize!(IncomeCategory);
serde_plain::derive_fromstr_from_deserialize!(IncomeCategory);

impl IncomeCategory {
    /// The vocabulary in display order.
    pub const ALL: [IncomeCategory; 5] = [
        IncomeCategory::Salary,
        IncomeCategory::Freelance,
        IncomeCategory::Investment,
        IncomeCategory::Business,
        IncomeCategory::Other,
    ];

    pub fn info(&self) -> &'static CategoryInfo {
        match self {
            IncomeCategory::Salary => &CategoryInfo {
                key: "salary",
                label: "Salary",
                color: "#52B788",
            },
            IncomeCategory::Freelance => &CategoryInfo {
                key: "freelance",
                label: "Freelance",
                color: "#74C69D",
            },
            IncomeCategory::Investment => &CategoryInfo {
                key: "investment",
                label: "Investment Returns",
                color: "#95D5B2",
            },
            IncomeCategory::Business => &CategoryInfo {
                key: "business",
                label: "Business",
                color: "#B7E4C7",
            },
            IncomeCategory::Other => &OTHER_INCOME,
        }
    }
}

/// Returns the category vocabulary of `transaction_type` in display order.
pub fn vocabulary(transaction_type: TransactionType) -> Vec<&'static CategoryInfo> {
    match transaction_type {
        TransactionType::Income => IncomeCategory::ALL.iter().map(|c| c.info()).collect(),
        TransactionType::Expense => ExpenseCategory::ALL.iter().map(|c| c.info()).collect(),
    }
}

/// The entry that unknown keys of `transaction_type` resolve to.
pub fn fallback_category(transaction_type: TransactionType) -> &'static CategoryInfo {
    match transaction_type {
        TransactionType::Income => &OTHER_INCOME,
        TransactionType::Expense => &OTHER_EXPENSE,
    }
}

/// The category preselected when a new transaction of `transaction_type` is created.
pub fn default_category(transaction_type: TransactionType) -> &'static CategoryInfo {
    match transaction_type {
        TransactionType::Income => IncomeCategory::Salary.info(),
        TransactionType::Expense => ExpenseCategory::Food.info(),
    }
}

/// Looks up `key` in the vocabulary of `transaction_type`, falling back to the "other" entry when
/// the key is unknown. Never fails.
pub fn resolve_category(key: &str, transaction_type: TransactionType) -> &'static CategoryInfo {
    let found = match transaction_type {
        TransactionType::Income => key.parse::<IncomeCategory>().ok().map(|c| c.info()),
        TransactionType::Expense => key.parse::<ExpenseCategory>().ok().map(|c| c.info()),
    };
    found.unwrap_or_else(|| fallback_category(transaction_type))
}

/// Whether `key` is part of the vocabulary of `transaction_type`.
pub fn is_known_category(key: &str, transaction_type: TransactionType) -> bool {
    match transaction_type {
        TransactionType::Income => key.parse::<IncomeCategory>().is_ok(),
        TransactionType::Expense => key.parse::<ExpenseCategory>().is_ok(),
    }
}

/// Key to color pairs of the vocabulary of `transaction_type`, in display order.
pub fn category_colors(transaction_type: TransactionType) -> Vec<(&'static str, &'static str)> {
    vocabulary(transaction_type)
        .into_iter()
        .map(|info| (info.key, info.color))
        .collect()
}

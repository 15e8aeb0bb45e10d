//! Parsing of JSON import files.
//!
//! An import file is a JSON array of transaction objects in the persisted format, except that
//! `id` and `createdAt` may be missing. Parsing is all-or-nothing: if any element fails, nothing
//! is imported.

use crate::model::transaction::deserialize_date;
use crate::model::{Amount, Transaction, TransactionId, TransactionType};
use crate::{utils, Result};
use anyhow::{bail, ensure, Context};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::path::Path;

/// A transaction read from an import file, before its id has been settled.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRecord {
    #[serde(default)]
    id: Option<TransactionId>,
    #[serde(rename = "type")]
    transaction_type: TransactionType,
    amount: Amount,
    category: String,
    #[serde(deserialize_with = "deserialize_date")]
    date: NaiveDate,
    #[serde(default)]
    note: Option<String>,
    #[serde(default)]
    recurring: bool,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl ImportRecord {
    pub fn id(&self) -> Option<&TransactionId> {
        self.id.as_ref()
    }

    pub(crate) fn into_transaction(self, id: TransactionId) -> Transaction {
        Transaction {
            id,
            transaction_type: self.transaction_type,
            amount: self.amount,
            category: self.category,
            date: self.date,
            note: self.note,
            recurring: self.recurring,
            created_at: self.created_at,
        }
    }
}

/// Parses the contents of an import file.
///
/// # Errors
/// - The text is not valid JSON.
/// - The top-level value is not an array.
/// - Any element does not have the shape of a transaction.
/// - Any amount is larger than `Amount::MAX`.
pub fn parse_import(json: &str) -> Result<Vec<ImportRecord>> {
    let value: serde_json::Value =
        serde_json::from_str(json).context("The import file is not valid JSON")?;
    let serde_json::Value::Array(items) = value else {
        bail!("The import file must contain a JSON array of transactions");
    };
    items
        .into_iter()
        .enumerate()
        .map(|(ix, item)| {
            let record: ImportRecord = serde_json::from_value(item)
                .with_context(|| format!("Transaction at index {ix} could not be read"))?;
            ensure!(
                record.amount.is_within_limit(),
                "Transaction at index {ix} has an amount of {}, which is larger than {}",
                record.amount.value(),
                Amount::MAX.value()
            );
            Ok(record)
        })
        .collect()
}

/// Reads and parses an import file.
pub async fn read_import(path: &Path) -> Result<Vec<ImportRecord>> {
    let content = utils::read(path).await?;
    parse_import(&content).with_context(|| format!("Unable to import {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_parse_import() {
        let json = r#"[
            {"id": 5, "type": "income", "amount": 1000, "category": "salary", "date": "2024-01-15",
             "note": "", "recurring": false, "createdAt": "2024-01-15T08:00:00.000Z"},
            {"type": "expense", "amount": 12.5, "category": "food", "date": "2024-01-20"}
        ]"#;
        let parsed = parse_import(json).unwrap();
        assert_eq!(parsed.len(), 2);
        assert_eq!(parsed[0].id(), Some(&TransactionId::Number(5)));
        assert_eq!(parsed[1].id(), None);
        let t = parsed[1].clone().into_transaction(TransactionId::Number(9));
        assert_eq!(t.category(), "food");
        assert_eq!(t.month().to_string(), "2024-01");
    }

    #[test]
    fn test_parse_import_empty_array() {
        assert!(parse_import("[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_import_rejects_malformed_json() {
        let err = parse_import("[{").unwrap_err();
        assert!(err.to_string().contains("not valid JSON"));
    }

    #[test]
    fn test_parse_import_rejects_non_array() {
        let err = parse_import(r#"{"transactions": []}"#).unwrap_err();
        assert!(err.to_string().contains("JSON array"));
    }

    #[test]
    fn test_parse_import_rejects_bad_element() {
        let json = r#"[
            {"type": "expense", "amount": 1, "category": "food", "date": "2024-01-20"},
            {"type": "expense", "category": "food", "date": "2024-01-20"}
        ]"#;
        let err = parse_import(json).unwrap_err();
        assert!(err.to_string().contains("index 1"));
    }

    #[test]
    fn test_parse_import_rejects_bad_date() {
        let json = r#"[{"type": "expense", "amount": 1, "category": "food", "date": "soon"}]"#;
        let err = parse_import(json).unwrap_err();
        assert!(format!("{err:#}").contains("Invalid date 'soon'"));
    }

    #[test]
    fn test_parse_import_rejects_huge_amount() {
        let json = r#"[
            {"type": "expense", "amount": 1, "category": "food", "date": "2024-01-20"},
            {"type": "expense", "amount": 79228162514264337593543950335, "category": "food",
             "date": "2024-01-21"}
        ]"#;
        let err = parse_import(json).unwrap_err();
        assert!(err.to_string().contains("index 1"));
        assert!(err.to_string().contains("larger than"));

        let json = r#"[{"type": "income", "amount": "1000000000000000", "category": "salary",
                        "date": "2024-01-20"}]"#;
        assert_eq!(parse_import(json).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_import_keeps_exact_amounts() {
        let json = r#"[{"type": "expense", "amount": 123456789012.3456789,
                        "category": "food", "date": "2024-01-20"}]"#;
        let parsed = parse_import(json).unwrap();
        let t = parsed[0].clone().into_transaction(TransactionId::Number(1));
        assert_eq!(t.amount(), Amount::from_str("123456789012.3456789").unwrap());
    }
}

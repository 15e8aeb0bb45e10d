use crate::args::EditArgs;
use crate::commands::{open_ledger, Out};
use crate::model::Transaction;
use crate::{Config, Result};

/// Merges the given fields into an existing transaction. Fields that were not given are kept.
pub async fn edit(config: Config, args: EditArgs) -> Result<Out<Transaction>> {
    let changes = args.edit();
    let mut ledger = open_ledger(&config).await?;
    if changes.is_empty() {
        if let Some(existing) = ledger.find(args.id()) {
            return Ok(Out::new(
                format!("Nothing to change for transaction {}", args.id()),
                existing.clone(),
            ));
        }
    }
    let edited = ledger.edit(args.id(), &changes).await?;
    Ok(Out::new(format!("Updated transaction {}", edited.id()), edited))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{error_type, ErrorType};
    use crate::model::{parse_date, Amount, TransactionEdit, TransactionId, TransactionType};
    use crate::test::TestEnv;
    use std::str::FromStr;

    #[tokio::test]
    async fn test_edit() {
        let env = TestEnv::new().await;
        let t = env
            .add(TransactionType::Expense, "10", "food", "2024-03-01")
            .await;
        let changes = TransactionEdit {
            category: Some("transportation".to_string()),
            date: Some(parse_date("2024-03-02").unwrap()),
            ..Default::default()
        };
        let out = edit(env.config(), EditArgs::new(t.id().clone(), changes))
            .await
            .unwrap();
        assert_eq!(out.message(), format!("Updated transaction {}", t.id()));

        let ledger = env.ledger().await;
        let saved = ledger.find(t.id()).unwrap();
        assert_eq!(saved.category(), "transportation");
        assert_eq!(saved.date(), parse_date("2024-03-02").unwrap());
        assert_eq!(saved.amount(), t.amount());
    }

    #[tokio::test]
    async fn test_edit_nothing() {
        let env = TestEnv::new().await;
        let t = env
            .add(TransactionType::Expense, "10", "food", "2024-03-01")
            .await;
        let out = edit(
            env.config(),
            EditArgs::new(t.id().clone(), TransactionEdit::default()),
        )
        .await
        .unwrap();
        assert!(out.message().starts_with("Nothing to change"));
        assert_eq!(out.structure(), Some(&t));
    }

    #[tokio::test]
    async fn test_edit_unknown_id() {
        let env = TestEnv::new().await;
        for changes in [
            TransactionEdit::default(),
            TransactionEdit {
                note: Some("x".to_string()),
                ..Default::default()
            },
        ] {
            let err = edit(
                env.config(),
                EditArgs::new(TransactionId::from_str("nope").unwrap(), changes),
            )
            .await
            .unwrap_err();
            assert_eq!(error_type(&err), Some(ErrorType::NotFound));
        }
    }

    #[tokio::test]
    async fn test_edit_rejects_negative_amount() {
        let env = TestEnv::new().await;
        let t = env
            .add(TransactionType::Expense, "10", "food", "2024-03-01")
            .await;
        let changes = TransactionEdit {
            amount: Some(Amount::from_str("-1").unwrap()),
            ..Default::default()
        };
        let err = edit(env.config(), EditArgs::new(t.id().clone(), changes))
            .await
            .unwrap_err();
        assert_eq!(error_type(&err), Some(ErrorType::Validation));
        assert_eq!(env.ledger().await.find(t.id()), Some(&t));
    }
}

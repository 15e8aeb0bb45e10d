//! Delete command handlers.

use crate::args::{ClearArgs, DeleteArgs};
use crate::commands::{open_ledger, plural, Out};
use crate::confirm::{AssumeYes, Confirm};
use crate::model::Transaction;
use crate::state::not_found;
use crate::{Config, Result};

/// Deletes one transaction by id after asking `confirm`, unless `--yes` was given. The structure
/// is the deleted transaction, or `None` when the user declined.
pub async fn delete(
    config: Config,
    args: DeleteArgs,
    confirm: &dyn Confirm,
) -> Result<Out<Option<Transaction>>> {
    let mut ledger = open_ledger(&config).await?;
    let Some(t) = ledger.find(args.id()) else {
        return not_found(args.id());
    };
    let prompt = format!(
        "Delete the {} {} of {} on {}?",
        t.category(),
        t.transaction_type(),
        t.amount(),
        t.date()
    );
    let confirm: &dyn Confirm = if args.yes() { &AssumeYes } else { confirm };
    if !confirm.confirm(&prompt) {
        return Ok(Out::new("Nothing was deleted", None));
    }
    let deleted = ledger.delete(args.id()).await?;
    Ok(Out::new(
        format!("Deleted transaction {}", deleted.id()),
        Some(deleted),
    ))
}

/// Deletes every transaction after asking `confirm`, unless `--yes` was given. The structure is
/// the number of deleted transactions.
pub async fn clear(config: Config, args: ClearArgs, confirm: &dyn Confirm) -> Result<Out<usize>> {
    let mut ledger = open_ledger(&config).await?;
    let confirm: &dyn Confirm = if args.yes() { &AssumeYes } else { confirm };
    let count = ledger.clear(confirm).await?;
    let message = if count == 0 {
        "Nothing was deleted".to_string()
    } else {
        format!("Deleted {}", plural(count, "transaction", "transactions"))
    };
    Ok(Out::new(message, count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::confirm::FixedAnswer;
    use crate::error::{error_type, ErrorType};
    use crate::model::{TransactionId, TransactionType};
    use crate::test::TestEnv;

    #[tokio::test]
    async fn test_delete_success() {
        let env = TestEnv::new().await;
        let t = env
            .add(TransactionType::Expense, "4.50", "food", "2025-01-15")
            .await;
        let confirm = FixedAnswer::new(true);

        let out = delete(env.config(), DeleteArgs::new(t.id().clone(), false), &confirm)
            .await
            .unwrap();

        assert_eq!(out.message(), format!("Deleted transaction {}", t.id()));
        assert_eq!(out.structure(), Some(&Some(t.clone())));
        assert_eq!(
            confirm.asked(),
            vec!["Delete the food expense of $4.50 on 2025-01-15?".to_string()]
        );
        assert!(env.ledger().await.transactions().is_empty());
    }

    #[tokio::test]
    async fn test_delete_declined() {
        let env = TestEnv::new().await;
        let t = env
            .add(TransactionType::Expense, "4.50", "food", "2025-01-15")
            .await;
        let out = delete(
            env.config(),
            DeleteArgs::new(t.id().clone(), false),
            &FixedAnswer::new(false),
        )
        .await
        .unwrap();
        assert_eq!(out.structure(), Some(&None));
        assert_eq!(env.ledger().await.transactions().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_yes_skips_prompt() {
        let env = TestEnv::new().await;
        let t = env
            .add(TransactionType::Income, "100", "gift", "2025-01-15")
            .await;
        let confirm = FixedAnswer::new(false);
        delete(env.config(), DeleteArgs::new(t.id().clone(), true), &confirm)
            .await
            .unwrap();
        assert!(confirm.asked().is_empty());
        assert!(env.ledger().await.transactions().is_empty());
    }

    #[tokio::test]
    async fn test_delete_not_found_error() {
        let env = TestEnv::new().await;
        let confirm = FixedAnswer::new(true);
        let err = delete(
            env.config(),
            DeleteArgs::new(TransactionId::Number(1), true),
            &confirm,
        )
        .await
        .unwrap_err();
        assert_eq!(error_type(&err), Some(ErrorType::NotFound));
        assert!(err.to_string().contains("no transaction with id 1"));
    }

    #[tokio::test]
    async fn test_clear() {
        let env = TestEnv::new().await;
        env.add_sample().await;

        let out = clear(env.config(), ClearArgs::new(false), &FixedAnswer::new(false))
            .await
            .unwrap();
        assert_eq!(out.message(), "Nothing was deleted");
        assert_eq!(env.ledger().await.transactions().len(), 4);

        let out = clear(env.config(), ClearArgs::new(true), &FixedAnswer::new(false))
            .await
            .unwrap();
        assert_eq!(out.message(), "Deleted 4 transactions");
        assert_eq!(out.structure(), Some(&4));
        assert!(env.ledger().await.transactions().is_empty());
    }
}

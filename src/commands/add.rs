use crate::args::AddArgs;
use crate::commands::{open_ledger, Out};
use crate::model::Transaction;
use crate::{Config, Result};
use chrono::NaiveDate;

/// Records a new transaction. When no date is given the transaction is dated `today`.
pub async fn add(config: Config, args: AddArgs, today: NaiveDate) -> Result<Out<Transaction>> {
    let mut ledger = open_ledger(&config).await?;
    let transaction = ledger.add(args.to_new_transaction(today)).await?;
    let message = format!(
        "Added {} {} of {} on {} with id {}",
        transaction.category(),
        transaction.transaction_type(),
        transaction.amount(),
        transaction.date(),
        transaction.id()
    );
    Ok(Out::new(message, transaction))
}

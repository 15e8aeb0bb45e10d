//! The `Ledger` holds the transaction list and the dark-mode flag in memory and writes every change
//! through to a `KvStore`.
//!
//! Every mutation builds the new list first, persists it, and only then replaces the in-memory
//! copy. If the store fails the `Ledger` is left exactly as it was.

use crate::confirm::Confirm;
use crate::error::{ErrorType, IntoResult};
use crate::import::ImportRecord;
use crate::model::{NewTransaction, Transaction, TransactionEdit, TransactionId};
use crate::store::{KvStore, DARK_MODE_KEY, TRANSACTIONS_KEY};
use crate::Result;
use anyhow::{anyhow, Context};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use tracing::{debug, info, warn};

pub struct Ledger<S> {
    store: S,
    transactions: Vec<Transaction>,
    dark_mode: bool,
}

impl<S> std::fmt::Debug for Ledger<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("transactions", &self.transactions.len())
            .field("dark_mode", &self.dark_mode)
            .finish()
    }
}

impl<S: KvStore> Ledger<S> {
    /// Reads the transactions and the dark-mode flag from `store`. Missing values start out empty.
    /// Values that cannot be read or parsed are logged and replaced by the default. Before that, the
    /// stored bytes are copied to `<key>.corrupt` so they are not lost on the next save.
    pub async fn load(mut store: S) -> Self {
        let transactions: Vec<Transaction> = load_value(&mut store, TRANSACTIONS_KEY).await;
        let dark_mode: bool = load_value(&mut store, DARK_MODE_KEY).await;
        debug!(
            "Loaded {} transactions, dark mode {}",
            transactions.len(),
            dark_mode
        );
        Self {
            store,
            transactions,
            dark_mode,
        }
    }

    /// All transactions, newest additions first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    pub fn dark_mode(&self) -> bool {
        self.dark_mode
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn find(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id() == id)
    }

    /// Validates `new`, gives it a fresh id and the current time, and puts it at the front.
    pub async fn add(&mut self, new: NewTransaction) -> Result<Transaction> {
        self.add_at(new, Utc::now()).await
    }

    pub(crate) async fn add_at(
        &mut self,
        new: NewTransaction,
        now: DateTime<Utc>,
    ) -> Result<Transaction> {
        let id = TransactionId::Number(self.next_id(now));
        let transaction = new
            .into_transaction(id, now)
            .pub_result(ErrorType::Validation)?;
        let mut transactions = Vec::with_capacity(self.transactions.len() + 1);
        transactions.push(transaction.clone());
        transactions.extend(self.transactions.iter().cloned());
        self.save_transactions(transactions).await?;
        info!("Added transaction {}", transaction.id());
        Ok(transaction)
    }

    /// Merges `edit` into the transaction with `id`.
    pub async fn edit(&mut self, id: &TransactionId, edit: &TransactionEdit) -> Result<Transaction> {
        edit.validate().pub_result(ErrorType::Validation)?;
        let Some(ix) = self.position(id) else {
            return not_found(id);
        };
        let mut transactions = self.transactions.clone();
        edit.apply(&mut transactions[ix]);
        let edited = transactions[ix].clone();
        self.save_transactions(transactions).await?;
        info!("Updated transaction {id}");
        Ok(edited)
    }

    /// Removes the transaction with `id` and returns it.
    pub async fn delete(&mut self, id: &TransactionId) -> Result<Transaction> {
        let Some(ix) = self.position(id) else {
            return not_found(id);
        };
        let mut transactions = self.transactions.clone();
        let removed = transactions.remove(ix);
        self.save_transactions(transactions).await?;
        info!("Deleted transaction {id}");
        Ok(removed)
    }

    /// Removes every transaction, but only if `confirm` agrees. Returns how many were removed,
    /// which is zero when the user declined or there was nothing to remove.
    pub async fn clear(&mut self, confirm: &dyn Confirm) -> Result<usize> {
        let count = self.transactions.len();
        if count == 0 {
            return Ok(0);
        }
        let prompt = format!(
            "Delete all {count} transaction{}? This cannot be undone.",
            plural(count)
        );
        if !confirm.confirm(&prompt) {
            debug!("Clearing was declined");
            return Ok(0);
        }
        self.save_transactions(Vec::new()).await?;
        info!("Deleted all {count} transactions");
        Ok(count)
    }

    /// Puts `records` in front of the existing transactions, keeping the file order. Records
    /// without an id, or whose id is already taken, get a fresh one.
    pub async fn import(&mut self, records: Vec<ImportRecord>) -> Result<usize> {
        self.import_at(records, Utc::now()).await
    }

    pub(crate) async fn import_at(
        &mut self,
        records: Vec<ImportRecord>,
        now: DateTime<Utc>,
    ) -> Result<usize> {
        let count = records.len();
        if count == 0 {
            return Ok(0);
        }
        let mut taken: HashSet<TransactionId> =
            self.transactions.iter().map(|t| t.id().clone()).collect();
        let mut next = self.next_id(now);
        let mut transactions = Vec::with_capacity(count + self.transactions.len());
        for record in records {
            let id = match record.id() {
                Some(id) if !taken.contains(id) => id.clone(),
                existing => {
                    let n = free_id(next, |n| taken.contains(&TransactionId::Number(n)));
                    next = n.saturating_add(1);
                    let fresh = TransactionId::Number(n);
                    if let Some(existing) = existing {
                        debug!("Imported id {existing} is taken, using {fresh}");
                    }
                    fresh
                }
            };
            taken.insert(id.clone());
            transactions.push(record.into_transaction(id));
        }
        transactions.extend(self.transactions.iter().cloned());
        self.save_transactions(transactions).await?;
        info!("Imported {count} transaction{}", plural(count));
        Ok(count)
    }

    pub async fn set_dark_mode(&mut self, dark_mode: bool) -> Result<()> {
        let json = serde_json::to_string(&dark_mode).context("Unable to serialize dark mode")?;
        self.store
            .set(DARK_MODE_KEY, &json)
            .await
            .context("Unable to save the dark mode setting")
            .pub_result(ErrorType::Storage)?;
        self.dark_mode = dark_mode;
        Ok(())
    }

    /// Flips the dark-mode flag and returns the new value.
    pub async fn toggle_dark_mode(&mut self) -> Result<bool> {
        let dark_mode = !self.dark_mode;
        self.set_dark_mode(dark_mode).await?;
        Ok(dark_mode)
    }

    fn position(&self, id: &TransactionId) -> Option<usize> {
        self.transactions.iter().position(|t| t.id() == id)
    }

    /// Millisecond timestamp ids, moved past the largest numeric id already in the list so that
    /// two additions within the same millisecond, or a clock that went backwards, cannot collide.
    /// When the largest id is `u64::MAX` the search starts from `now` and skips taken ids.
    fn next_id(&self, now: DateTime<Utc>) -> u64 {
        let now = u64::try_from(now.timestamp_millis()).unwrap_or_default();
        let numbers: HashSet<u64> = self
            .transactions
            .iter()
            .filter_map(|t| t.id().as_number())
            .collect();
        let start = match numbers.iter().max() {
            Some(&max) if max >= now => max.checked_add(1).unwrap_or(now),
            _ => now,
        };
        free_id(start, |n| numbers.contains(&n))
    }

    async fn save_transactions(&mut self, transactions: Vec<Transaction>) -> Result<()> {
        let json =
            serde_json::to_string(&transactions).context("Unable to serialize transactions")?;
        self.store
            .set(TRANSACTIONS_KEY, &json)
            .await
            .context("Unable to save transactions")
            .pub_result(ErrorType::Storage)?;
        self.transactions = transactions;
        Ok(())
    }
}

async fn load_value<S, T>(store: &mut S, key: &str) -> T
where
    S: KvStore,
    T: DeserializeOwned + Default,
{
    let raw = match store.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => return T::default(),
        Err(e) => {
            warn!("Unable to read '{key}', starting with the default: {e:#}");
            keep_corrupt(store, key).await;
            return T::default();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            warn!("The stored '{key}' could not be parsed, starting with the default: {e}");
            keep_corrupt(store, key).await;
            T::default()
        }
    }
}

async fn keep_corrupt<S: KvStore>(store: &mut S, key: &str) {
    let backup = format!("{key}.corrupt");
    match store.copy(key, &backup).await {
        Ok(()) => info!("Kept a copy of the unreadable '{key}' as '{backup}'"),
        Err(e) => warn!("Unable to keep a copy of the unreadable '{key}': {e:#}"),
    }
}

/// The first id at or above `start` that is not taken, or failing that the closest one below it.
fn free_id(start: u64, taken: impl Fn(u64) -> bool) -> u64 {
    (start..=u64::MAX)
        .chain((0..start).rev())
        .find(|&n| !taken(n))
        .unwrap_or(start)
}

pub(crate) fn not_found<T>(id: &TransactionId) -> Result<T> {
    Err::<T, _>(anyhow!("There is no transaction with id {id}")).pub_result(ErrorType::NotFound)
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

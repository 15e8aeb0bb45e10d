//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::args::AddArgs;
use crate::model::{parse_date, Amount, Transaction, TransactionType};
use crate::state::Ledger;
use crate::store::FileStore;
use crate::Config;
use std::str::FromStr;
use tempfile::TempDir;

/// Test environment that sets up a fin home directory with a Config and an empty store.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::create(temp_dir.path().join("fin")).await.unwrap();
        Self { temp_dir, config }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// A scratch directory next to the home directory, for import and export files.
    pub fn scratch(&self) -> &std::path::Path {
        self.temp_dir.path()
    }

    /// Loads the ledger fresh from disk, seeing everything the commands have saved.
    pub async fn ledger(&self) -> Ledger<FileStore> {
        Ledger::load(self.config.store().await.unwrap()).await
    }

    /// Adds a transaction through the `add` command and returns it.
    pub async fn add(
        &self,
        transaction_type: TransactionType,
        amount: &str,
        category: &str,
        date: &str,
    ) -> Transaction {
        let args = AddArgs::new(transaction_type, Amount::from_str(amount).unwrap())
            .with_category(category)
            .with_date(parse_date(date).unwrap());
        let today = parse_date(date).unwrap();
        crate::commands::add(self.config(), args, today)
            .await
            .unwrap()
            .structure()
            .cloned()
            .unwrap()
    }

    /// One salary in January, then food and transportation expenses in January and February 2024.
    pub async fn add_sample(&self) {
        self.add(TransactionType::Income, "3000", "salary", "2024-01-01")
            .await;
        self.add(TransactionType::Expense, "120", "food", "2024-01-10")
            .await;
        self.add(TransactionType::Expense, "80", "food", "2024-02-03")
            .await;
        self.add(TransactionType::Expense, "45.50", "transportation", "2024-02-04")
            .await;
    }
}

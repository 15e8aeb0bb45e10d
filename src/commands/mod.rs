//! Command handlers for the fin CLI.
//!
//! This module contains implementations for all CLI subcommands. Each handler loads what it needs
//! from the `Config`, does its work, and returns an `Out` holding a text message for the terminal
//! and the structured result for `--json`.

mod add;
mod delete;
mod edit;
mod init;
mod report;
mod theme;
mod transfer;

use crate::error::{ErrorType, IntoResult};
use crate::state::Ledger;
use crate::store::FileStore;
use crate::{Config, Result};
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, error};

pub use add::add;
pub use delete::{clear, delete};
pub use edit::edit;
pub use init::init;
pub use report::{categories, list, monthly, months, summary};
pub use theme::{theme, Theme};
pub use transfer::{export, import, ExportOut};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data to both the terminal and `--json` consumers.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to stdout or, when `json` is set, the whole `Out` as JSON.
    pub fn print(&self, json: bool) {
        if !json {
            println!("{}", self.message);
            return;
        }
        match serde_json::to_string_pretty(self) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                error!("Unable to serialize the command output: {e}");
                println!("{}", self.message);
            }
        }
    }
}

/// Opens the store in the home directory and loads the ledger from it.
async fn open_ledger(config: &Config) -> Result<Ledger<FileStore>> {
    let store = config.store().await.pub_result(ErrorType::Storage)?;
    debug!("Loading the ledger from {}", store.dir().display());
    Ok(Ledger::load(store).await)
}

fn plural(count: usize, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{count} {singular}")
    } else {
        format!("{count} {plural}")
    }
}

pub mod args;
pub mod commands;
mod config;
mod confirm;
pub mod engine;
mod error;
pub mod export;
pub mod import;
pub mod model;
mod state;
pub mod store;
mod utils;

#[cfg(test)]
mod test;

pub use config::Config;
pub use confirm::{AssumeYes, Confirm, PromptConfirm};
pub use error::{error_type, Error, ErrorType, IntoResult, PubError, Result};
pub use state::Ledger;

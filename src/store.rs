//! A very small string-keyed key-value store, which is where all application state is persisted.
//!
//! `FileStore` keeps one JSON file per key in the store directory. `MemoryStore` keeps everything
//! in memory and is used by tests.

use crate::{utils, Result};
use anyhow::{ensure, Context};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::trace;

/// Key under which the transaction list is stored as a JSON array.
pub const TRANSACTIONS_KEY: &str = "transactions";

/// Key under which the dark-mode flag is stored as a JSON boolean.
pub const DARK_MODE_KEY: &str = "darkMode";

/// A string-keyed store of string values.
#[async_trait::async_trait]
pub trait KvStore: Send + Sync {
    /// Returns `None` when nothing has been stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&mut self, key: &str, value: &str) -> Result<()>;

    /// Copies whatever is stored under `from` to `to` byte for byte, even when it is not text.
    async fn copy(&mut self, from: &str, to: &str) -> Result<()>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates `dir` if it does not exist.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        utils::make_dir(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> Result<PathBuf> {
        ensure!(
            !key.is_empty()
                && key
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.'),
            "Invalid store key '{key}'"
        );
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait::async_trait]
impl KvStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key)?;
        trace!("get {key} from {}", path.display());
        utils::read_optional(&path).await
    }

    async fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.path(key)?;
        trace!("set {key} in {}", path.display());
        utils::write_replace(&path, value).await
    }

    async fn copy(&mut self, from: &str, to: &str) -> Result<()> {
        let from = self.path(from)?;
        let to = self.path(to)?;
        trace!("copy {} to {}", from.display(), to.display());
        utils::copy(&from, &to).await
    }
}

/// An in-memory `KvStore`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `key` = `value`.
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.data.insert(key.to_string(), value.to_string());
        self
    }

    pub fn raw(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }
}

#[async_trait::async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.data.get(key).cloned())
    }

    async fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.data.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn copy(&mut self, from: &str, to: &str) -> Result<()> {
        let value = self
            .data
            .get(from)
            .cloned()
            .with_context(|| format!("Nothing is stored under '{from}'"))?;
        self.data.insert(to.to_string(), value);
        Ok(())
    }
}

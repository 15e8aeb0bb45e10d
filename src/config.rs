//! Configuration file handling for fin.
//!
//! The configuration file is stored at `$FIN_HOME/config.json`. The transactions and settings
//! themselves live in the key-value store under `$FIN_HOME/store`.

use crate::store::FileStore;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "fin";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const STORE: &str = "store";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$FIN_HOME` and from there it loads `$FIN_HOME/config.json`. It provides paths to
/// the other items that are expected in a certain location within the home directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    store_dir: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the data directory, the store directory and an initial `config.json`. Running it
    /// again on an existing home directory keeps the existing `config.json` and data.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of data directory, e.g. `$HOME/fin`
    ///
    /// # Errors
    /// - Returns an error if any file operations fail, or if an existing `config.json` is invalid.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the fin home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let store_dir = root.join(STORE);
        utils::make_dir(&store_dir).await?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = if config_path.is_file() {
            ConfigFile::load(&config_path).await?
        } else {
            let config_file = ConfigFile::default();
            config_file.save(&config_path).await?;
            config_file
        };

        Ok(Self {
            root,
            config_path,
            store_dir,
            config_file,
        })
    }

    /// This will
    /// - validate that the home directory exists and that the config file exists
    /// - load the config file
    /// - validate that the store directory exists
    /// - return the loaded configuration object
    pub async fn load(fin_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = fin_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The fin home directory is missing, run `fin init` first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let store_dir = root.join(STORE);
        if !store_dir.is_dir() {
            bail!(
                "The store directory is missing '{}'",
                store_dir.display()
            )
        }

        Ok(Self {
            root,
            config_path,
            store_dir,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn store_dir(&self) -> &Path {
        &self.store_dir
    }

    /// Opens the key-value store that holds the transactions and settings.
    pub async fn store(&self) -> Result<FileStore> {
        FileStore::open(&self.store_dir).await
    }

    /// The directory exports are written to when no path is given. Relative paths in
    /// `config.json` are resolved against the home directory. Defaults to the current directory.
    pub fn export_dir(&self) -> PathBuf {
        match &self.config_file.export_dir {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => self.root.join(p),
            None => PathBuf::from("."),
        }
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "fin",
///   "config_version": 1,
///   "export_dir": "exports"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "fin"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Where `fin export` writes when `--out` is not given (optional, relative to the home
    /// directory or absolute)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    export_dir: Option<PathBuf>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            export_dir: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it belongs to another app.
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_create() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("fin_home");

        let config = Config::create(&home_dir).await.unwrap();

        assert!(config.root().is_dir());
        assert!(config.store_dir().is_dir());
        assert!(config.config_path().is_file());
        assert_eq!(config.export_dir(), PathBuf::from("."));

        let loaded = Config::load(&home_dir).await.unwrap();
        assert_eq!(loaded.root(), config.root());
    }

    #[tokio::test]
    async fn test_config_create_twice_keeps_config() {
        let dir = TempDir::new().unwrap();
        let config = Config::create(dir.path()).await.unwrap();
        let json = r#"{"app_name": "fin", "config_version": 1, "export_dir": "exports"}"#;
        utils::write(config.config_path(), json).await.unwrap();

        let again = Config::create(dir.path()).await.unwrap();
        assert_eq!(again.export_dir(), again.root().join("exports"));
    }

    #[tokio::test]
    async fn test_config_load_missing_home() {
        let dir = TempDir::new().unwrap();
        let result = Config::load(dir.path().join("nope")).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_config_load_missing_store() {
        let dir = TempDir::new().unwrap();
        let config = Config::create(dir.path()).await.unwrap();
        tokio::fs::remove_dir(config.store_dir()).await.unwrap();
        let err = Config::load(dir.path()).await.unwrap_err();
        assert!(err.to_string().contains("store directory is missing"));
    }

    #[test]
    fn test_config_file_default() {
        let config = ConfigFile::default();
        assert_eq!(config.app_name, "fin");
        assert_eq!(config.config_version, 1);
        assert_eq!(config.export_dir, None);
    }

    #[tokio::test]
    async fn test_config_file_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");

        let original_config = ConfigFile {
            export_dir: Some(PathBuf::from("/tmp/exports")),
            ..ConfigFile::default()
        };
        original_config.save(&config_path).await.unwrap();
        let loaded_config = ConfigFile::load(&config_path).await.unwrap();

        assert_eq!(original_config, loaded_config);
    }

    #[tokio::test]
    async fn test_config_file_load_invalid_app_name() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let json = r#"{
            "app_name": "wrong_app",
            "config_version": 1
        }"#;
        utils::write(&config_path, json).await.unwrap();

        let result = ConfigFile::load(&config_path).await;
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }

    #[test]
    fn test_config_file_serialization_omits_none_fields() {
        let json = serde_json::to_string(&ConfigFile::default()).unwrap();
        assert!(!json.contains("export_dir"));
    }
}

use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory, the store directory and an initial `config.json`.
///
/// # Arguments
/// - `fin_home` - The directory that will be the root of data directory, e.g. `$HOME/fin`
///
/// # Errors
/// - Returns an error if any file operations fail.
pub async fn init(fin_home: &Path) -> Result<Out<()>> {
    let config = Config::create(fin_home)
        .await
        .context("Unable to create the data directory and configs")
        .pub_result(ErrorType::Config)?;
    Ok(format!(
        "Successfully created the fin directory at {}",
        config.root().display()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("fin");
        let out = init(&home).await.unwrap();
        assert!(out.message().contains("Successfully created"));
        assert!(Config::load(&home).await.is_ok());
    }

    #[tokio::test]
    async fn test_init_bad_config() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("config.json"), "{}").unwrap();
        let err = init(dir.path()).await.unwrap_err();
        assert_eq!(crate::error::error_type(&err), Some(ErrorType::Config));
    }
}

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Broad categories of failure that are surfaced to the user by the command handlers.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The home directory or `config.json` is missing or invalid.
    Config,
    /// Reading or writing the key-value store failed.
    Storage,
    /// A new or edited transaction was rejected.
    Validation,
    /// An import file could not be parsed.
    Import,
    /// An export file could not be written.
    Export,
    /// A transaction id did not match any transaction.
    NotFound,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// An error that has been tagged with an `ErrorType` on its way out of a command handler.
pub struct PubError {
    error_type: ErrorType,
    inner: Error,
}

impl PubError {
    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }
}

impl Debug for PubError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:?}", self.error_type, self.inner)
    }
}

impl Display for PubError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:#}", self.error_type, self.inner)
    }
}

impl std::error::Error for PubError {}

/// Tags a `Result` with an `ErrorType` before it is handed back to the caller of a command.
pub trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| {
            let inner: Error = e.into();
            // Already tagged further down the stack; keep the original tag.
            if inner.downcast_ref::<PubError>().is_some() {
                return inner;
            }
            Error::new(PubError { error_type, inner })
        })
    }
}

/// Returns the `ErrorType` of `error` if it was tagged with `pub_result`.
pub fn error_type(error: &Error) -> Option<ErrorType> {
    error.downcast_ref::<PubError>().map(PubError::error_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn test_pub_result_tags_error() {
        let result: std::result::Result<(), Error> = Err(anyhow!("Transaction 7 not found"));
        let err = result.pub_result(ErrorType::NotFound).unwrap_err();
        assert_eq!(error_type(&err), Some(ErrorType::NotFound));
        assert_eq!(err.to_string(), "not_found error: Transaction 7 not found");
    }

    #[test]
    fn test_pub_result_keeps_first_tag() {
        let result: std::result::Result<(), Error> = Err(anyhow!("bad json"));
        let err = result
            .pub_result(ErrorType::Import)
            .pub_result(ErrorType::Storage)
            .unwrap_err();
        assert_eq!(error_type(&err), Some(ErrorType::Import));
    }

    #[test]
    fn test_untagged_error_has_no_type() {
        let err = anyhow!("plain");
        assert_eq!(error_type(&err), None);
    }
}

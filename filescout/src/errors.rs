use std::path::PathBuf;
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur during search operations
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid search root: {0}")]
    InvalidRoot(PathBuf),
    #[error("Search cancelled")]
    Cancelled,
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SearchError {
    pub fn invalid_root(path: impl Into<PathBuf>) -> Self {
        Self::InvalidRoot(path.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Returns true if this error is the cancellation outcome rather than a
    /// genuine failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = SearchError::invalid_root("missing/dir");
        assert!(matches!(err, SearchError::InvalidRoot(_)));

        let err = SearchError::config_error("bad yaml");
        assert!(matches!(err, SearchError::ConfigError(_)));

        assert!(SearchError::Cancelled.is_cancelled());
        assert!(!SearchError::invalid_root("x").is_cancelled());
    }

    #[test]
    fn test_error_messages() {
        let err = SearchError::invalid_root("missing/dir");
        assert_eq!(err.to_string(), "Invalid search root: missing/dir");

        let err = SearchError::config_error("missing required field");
        assert_eq!(
            err.to_string(),
            "Configuration error: missing required field"
        );

        assert_eq!(SearchError::Cancelled.to_string(), "Search cancelled");
    }
}

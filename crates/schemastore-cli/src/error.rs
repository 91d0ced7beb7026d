//! Error types and handling for the CLI

use schemastore::StoreError;
use std::io;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CLI operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Error from the schema store
    #[error(transparent)]
    Store(#[from] StoreError),

    /// IO error (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// Generic error with context
    #[error("{message}")]
    Other { message: String },
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a generic error with message
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Store(e) if e.is_not_found() => 2,
            Self::Store(
                StoreError::SchemaMismatch { .. }
                | StoreError::AmbiguousSchema { .. }
                | StoreError::UnresolvedReference { .. }
                | StoreError::CircularReference { .. }
                | StoreError::ResolutionDepthExceeded { .. }
                | StoreError::Parse { .. }
                | StoreError::JsonParse { .. }
                | StoreError::YamlParse { .. },
            ) => 3,
            _ => 1,
        }
    }

    /// Check if this error should display usage help
    pub fn should_show_help(&self) -> bool {
        matches!(self, Self::Store(StoreError::MissingRoot))
    }
}

/// Format an error for display to the user
pub fn format_error(error: &Error, use_color: bool) -> String {
    if use_color {
        use colored::Colorize;
        format!("{} {}", "Error:".red().bold(), error)
    } else {
        format!("Error: {}", error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_exit_codes() {
        let not_found = Error::from(StoreError::not_found("a.B", PathBuf::from("root/a/B.avsc")));
        assert_eq!(not_found.exit_code(), 2);

        let cycle = Error::from(StoreError::circular_reference(&["a".to_string(), "a".to_string()]));
        assert_eq!(cycle.exit_code(), 3);

        let mismatch = Error::from(StoreError::SchemaMismatch {
            name: "a".to_string(),
            path: PathBuf::from("root/a.avsc"),
            actual: "b".to_string(),
        });
        assert_eq!(mismatch.exit_code(), 3);

        let ambiguous = Error::from(StoreError::AmbiguousSchema {
            name: "u".to_string(),
            path: PathBuf::from("root/u.avsc"),
        });
        assert_eq!(ambiguous.exit_code(), 3);

        assert_eq!(Error::config("bad").exit_code(), 1);
        assert_eq!(Error::from(StoreError::MissingRoot).exit_code(), 1);
    }

    #[test]
    fn test_help_hint_for_missing_root() {
        assert!(Error::from(StoreError::MissingRoot).should_show_help());
        assert!(!Error::other("boom").should_show_help());
    }

    #[test]
    fn test_format_error_without_color() {
        let error = Error::from(StoreError::MissingRoot);
        assert_eq!(
            format_error(&error, false),
            "Error: missing required configuration option `root'"
        );
    }
}
